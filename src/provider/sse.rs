//! Incremental decoder for `text/event-stream` bodies.

const BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: Option<String>,
    pub data: String,
}

impl SseEvent {
    /// Unnamed events and events named `message` carry feed payloads.
    pub fn is_message(&self) -> bool {
        matches!(self.event.as_deref(), None | Some("message"))
    }
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    bom_checked: bool,
    skip_line_feed: bool,
    event: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one body chunk and returns every event it completed. Partial
    /// lines are kept until the next chunk.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        let mut events = vec![];

        for &byte in chunk {
            // a leading byte order mark may arrive split over several chunks
            if !self.bom_checked {
                let seen = self.buffer.len();
                if seen < BOM.len() && BOM[seen] == byte {
                    self.buffer.push(byte);
                    if self.buffer.len() == BOM.len() {
                        self.buffer.clear();
                        self.bom_checked = true;
                    }
                    continue;
                }
                self.bom_checked = true;
            }

            if self.skip_line_feed {
                self.skip_line_feed = false;
                if byte == b'\n' {
                    continue;
                }
            }

            match byte {
                b'\n' | b'\r' => {
                    self.skip_line_feed = byte == b'\r';
                    let line = std::mem::take(&mut self.buffer);
                    let line = String::from_utf8_lossy(&line);
                    if let Some(event) = self.process_line(&line) {
                        events.push(event);
                    }
                },
                _ => self.buffer.push(byte),
            }
        }

        events
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }

        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.find(':') {
            Some(index) => {
                let value = &line[index + 1..];
                (&line[..index], value.strip_prefix(' ').unwrap_or(value))
            },
            None => (line, ""),
        };

        match field {
            "data" => self.data.push(value.to_owned()),
            "event" => self.event = Some(value.to_owned()),
            _ => {},
        }

        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        let data = std::mem::take(&mut self.data);

        if data.is_empty() {
            return None;
        }

        let data = data.join("\n");
        if data.trim().is_empty() {
            return None;
        }

        Some(SseEvent { event, data })
    }
}
