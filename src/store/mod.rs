//! In-memory comment store and artifact serialization
//!
//! The store accumulates the run's parent comments and detached replies,
//! flattens them into one sibling-level record collection (parents first,
//! then all replies, both in insertion order), and writes the collection as
//! a JSON array. It also writes the zero-byte tombstone a failed run leaves
//! behind.

use crate::model::{Comment, CommentRecord, Reply};
use chrono::NaiveDate;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

/// Store-specific errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Accumulates one run's comments and serializes the flattened collection
#[derive(Debug)]
pub struct CommentStore {
    puzzle_date: NaiveDate,
    comments: Vec<Comment>,
    replies: Vec<Reply>,
}

impl CommentStore {
    pub fn new(puzzle_date: NaiveDate) -> Self {
        Self {
            puzzle_date,
            comments: Vec::new(),
            replies: Vec::new(),
        }
    }

    /// Appends parent comments in delivery order
    pub fn add_parents(&mut self, comments: Vec<Comment>) {
        self.comments.extend(comments);
    }

    /// Appends detached replies in delivery order
    pub fn add_replies(&mut self, replies: Vec<Reply>) {
        self.replies.extend(replies);
    }

    pub fn parent_count(&self) -> usize {
        self.comments.len()
    }

    pub fn reply_count(&self) -> usize {
        self.replies.len()
    }

    /// Flattens the store into sibling-level records
    ///
    /// Parents first, then all replies, both in insertion order. No
    /// filtering, no sorting: collection order is the server's delivery
    /// order. Pure, so calling it twice yields identical output.
    pub fn flatten(&self) -> Vec<CommentRecord> {
        let mut records = Vec::with_capacity(self.comments.len() + self.replies.len());

        for comment in &self.comments {
            let date = comment.puzzle_date.unwrap_or(self.puzzle_date);
            records.push(CommentRecord::from_comment(comment, date));
        }

        for reply in &self.replies {
            let date = reply.puzzle_date.unwrap_or(self.puzzle_date);
            records.push(CommentRecord::from_reply(reply, date));
        }

        records
    }

    /// Writes the flattened collection to `path` as a JSON array
    pub fn serialize(&self, path: &Path) -> Result<(), StoreError> {
        let records = self.flatten();
        let file = File::create(path)?;
        serde_json::to_writer(file, &records)?;
        Ok(())
    }

    /// Creates (or truncates to) an empty artifact file at `path`
    ///
    /// A failed run leaves this behind so downstream can distinguish
    /// "attempted but failed" from "never ran".
    pub fn write_tombstone(path: &Path) -> std::io::Result<()> {
        File::create(path)?;
        Ok(())
    }
}
