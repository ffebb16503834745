use std::collections::HashMap;
use std::future::pending;

use mongodb::bson::{Document, RawDocument, RawDocumentBuf};

use crate::error::{Error, Result};
use crate::mongo::stream::DocumentStream;

/// [`DocumentStream`] over documents held in memory.
///
/// Faults can be scheduled at a position to stand in for a failing or stalled
/// server.
#[derive(Debug, Default)]
pub struct MemoryStream {
    docs: Vec<RawDocumentBuf>,
    next: usize,
    current: Option<usize>,
    faults: HashMap<usize, Fault>,
    closed: bool,
    close_calls: usize,
}

#[derive(Debug)]
enum Fault {
    Fail(Error),
    Stall,
}

impl MemoryStream {
    pub fn new(docs: Vec<RawDocumentBuf>) -> Self {
        Self {
            docs,
            ..Self::default()
        }
    }

    pub fn from_documents<'a, I>(docs: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Document>,
    {
        let docs = docs
            .into_iter()
            .map(RawDocumentBuf::from_document)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self::new(docs))
    }

    /// Fail the advance that would reach document `index`.
    pub fn fail_at(mut self, index: usize, err: impl Into<Error>) -> Self {
        self.faults.insert(index, Fault::Fail(err.into()));
        self
    }

    /// Never complete the advance that would reach document `index`.
    pub fn stall_at(mut self, index: usize) -> Self {
        self.faults.insert(index, Fault::Stall);
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls
    }

    /// Documents not yet handed out.
    pub fn remaining(&self) -> usize {
        self.docs.len().saturating_sub(self.next)
    }
}

impl DocumentStream for MemoryStream {
    async fn advance(&mut self) -> Result<bool> {
        self.current = None;
        if self.closed {
            return Ok(false);
        }
        match self.faults.remove(&self.next) {
            Some(Fault::Fail(err)) => return Err(err),
            Some(Fault::Stall) => pending::<()>().await,
            None => {}
        }
        if self.next >= self.docs.len() {
            return Ok(false);
        }
        self.current = Some(self.next);
        self.next += 1;
        Ok(true)
    }

    fn current(&self) -> Option<&RawDocument> {
        self.current.map(|i| &*self.docs[i])
    }

    async fn close(&mut self) -> Result<()> {
        self.close_calls += 1;
        self.closed = true;
        self.current = None;
        Ok(())
    }
}
