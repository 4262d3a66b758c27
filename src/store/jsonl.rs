//! JSON Lines message store
//!
//! One message object per line. The file is memory-mapped and split on
//! newlines; blank lines are ignored.

use super::MessageStore;
use super::message::Message;
use ahash::AHashMap;
use anyhow::{Context, Result, bail};
use memmap2::Mmap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// In-memory message store loaded from a JSON Lines file
#[derive(Debug, Default)]
pub struct JsonlMessageStore {
    messages: Vec<Message>,
    by_id: AHashMap<String, usize>,
}

impl JsonlMessageStore {
    /// Load every message from `path`
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let len = file.metadata()?.len();
        if len == 0 {
            return Ok(Self::default());
        }

        let mmap = unsafe { Mmap::map(&file)? };
        let messages = parse_lines(&mmap)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        log::info!("loaded {} messages from {}", messages.len(), path.display());
        Self::from_messages(messages)
    }

    /// Build a store from already loaded messages
    ///
    /// Message ids must be unique.
    pub fn from_messages(messages: Vec<Message>) -> Result<Self> {
        let mut by_id = AHashMap::with_capacity(messages.len());
        for (i, msg) in messages.iter().enumerate() {
            if by_id.insert(msg.id.clone(), i).is_some() {
                bail!("Duplicate message id: {}", msg.id);
            }
        }
        Ok(Self { messages, by_id })
    }

    /// Write messages to `path`, one JSON object per line
    pub fn write(path: &Path, messages: &[Message]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        for msg in messages {
            serde_json::to_writer(&mut writer, msg)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl MessageStore for JsonlMessageStore {
    fn message(&self, id: &str) -> Option<&Message> {
        self.by_id.get(id).map(|&i| &self.messages[i])
    }

    fn messages(&self) -> &[Message] {
        &self.messages
    }
}

fn parse_lines(data: &[u8]) -> Result<Vec<Message>> {
    let mut messages = Vec::new();
    let mut start = 0;
    let mut line_number = 0;

    let ends = memchr::memchr_iter(b'\n', data).chain(std::iter::once(data.len()));
    for end in ends {
        line_number += 1;
        let line = &data[start..end];
        start = end + 1;

        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        let msg: Message = serde_json::from_slice(line)
            .with_context(|| format!("Malformed message on line {}", line_number))?;
        messages.push(msg);
    }

    Ok(messages)
}
