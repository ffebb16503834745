use crate::error::{Error, Result};
use crate::mongo::context::QueryContext;
use crate::mongo::record::{decode_document, decode_fields, Record};
use crate::mongo::stream::DocumentStream;
use crate::options::DecodePolicy;

/// Typed, decode-tolerant iteration over a query's result stream.
///
/// A cursor is single-owner and forward-only. It should be closed once the
/// caller is done with it; [`Cursor::all`] closes it on the caller's behalf.
pub struct Cursor<S> {
    ctx: QueryContext,
    stream: Option<S>,
    err: Option<Error>,
    last_err: Option<Error>,
    policy: DecodePolicy,
    closed: bool,
}

enum Step {
    Filled,
    Rejected(Error),
    Exhausted,
}

impl<S: DocumentStream> Cursor<S> {
    pub fn new(stream: S, ctx: QueryContext, policy: DecodePolicy) -> Self {
        Self {
            ctx,
            stream: Some(stream),
            err: None,
            last_err: None,
            policy,
            closed: false,
        }
    }

    /// A cursor whose every operation reports `err`.
    pub fn failed(err: Error, policy: DecodePolicy) -> Self {
        Self {
            ctx: QueryContext::background(),
            stream: None,
            err: Some(err),
            last_err: None,
            policy,
            closed: false,
        }
    }

    pub fn from_result(stream: Result<S>, ctx: QueryContext, policy: DecodePolicy) -> Self {
        match stream {
            Ok(stream) => Self::new(stream, ctx, policy),
            Err(err) => Self::failed(err, policy),
        }
    }

    pub fn policy(&self) -> DecodePolicy {
        self.policy
    }

    pub fn context(&self) -> &QueryContext {
        &self.ctx
    }

    pub fn get_ref(&self) -> Option<&S> {
        self.stream.as_ref()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Decode the next document into `target`.
    ///
    /// Returns `false` when the stream is exhausted, closed or failed; check
    /// [`Cursor::err`] to tell those apart. Under
    /// [`DecodePolicy::IgnoreField`] a fetched document always yields `true`
    /// and is written field by field through the record's field table:
    /// fields that are missing or fail to decode keep their current value, and
    /// fields not listed in the table are never written, clean row or not.
    ///
    /// The target must be a [`Record`]:
    ///
    /// ```compile_fail
    /// # use novadb_cursor::{Cursor, MemoryStream};
    /// # async fn misuse(cursor: &mut Cursor<MemoryStream>) {
    /// let mut count = 0_u32;
    /// cursor.next(&mut count).await;
    /// # }
    /// ```
    pub async fn next<T: Record>(&mut self, target: &mut T) -> bool {
        if self.err.is_some() || self.last_err.is_some() {
            return false;
        }
        match self.step(target).await {
            Ok(Step::Filled) => true,
            Ok(Step::Exhausted) => false,
            Ok(Step::Rejected(err)) | Err(err) => {
                self.last_err = Some(err);
                false
            }
        }
    }

    /// Decode every remaining document into `results`, then close the cursor.
    ///
    /// Existing elements of `results` are overwritten in place before new ones
    /// are appended, and the vector is truncated to the number of documents
    /// stored. Decode errors abort under [`DecodePolicy::Strict`]; otherwise
    /// they are tolerated at row or field granularity. Transport, deadline and
    /// cancellation errors are always returned.
    #[tracing::instrument(skip_all, fields(policy = ?self.policy))]
    pub async fn all<T: Record + Default>(&mut self, results: &mut Vec<T>) -> Result<()> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }

        let mut filled = 0;
        let mut row = 0_u64;
        let outcome = loop {
            if let Some(err) = &self.last_err {
                break Err(err.clone());
            }
            if filled == results.len() {
                results.push(T::default());
            }
            match self.step(&mut results[filled]).await {
                Ok(Step::Filled) => filled += 1,
                Ok(Step::Exhausted) => break Ok(()),
                Ok(Step::Rejected(err)) if self.policy == DecodePolicy::IgnoreRow => {
                    tracing::debug!(row, error = %err, "skipping undecodable row");
                }
                Ok(Step::Rejected(err)) | Err(err) => {
                    self.last_err = Some(err.clone());
                    break Err(err);
                }
            }
            row += 1;
        };
        results.truncate(filled);
        tracing::trace!(filled, "bulk read finished");

        let closed = self.close().await;
        outcome.and(closed)
    }

    /// The error that stopped the cursor, if any. `None` after a clean
    /// exhaustion.
    pub fn err(&self) -> Option<&Error> {
        self.err.as_ref().or(self.last_err.as_ref())
    }

    /// Release the underlying stream. `next` returns `false` afterwards.
    ///
    /// Runs outside the cursor's context so an expired or cancelled query
    /// still releases its server-side cursor.
    pub async fn close(&mut self) -> Result<()> {
        if let Some(err) = &self.err {
            return Err(err.clone());
        }
        self.closed = true;
        match self.stream.as_mut() {
            Some(stream) => stream.close().await,
            None => Ok(()),
        }
    }

    async fn step<T: Record>(&mut self, target: &mut T) -> Result<Step> {
        if self.closed {
            return Ok(Step::Exhausted);
        }
        let Some(stream) = self.stream.as_mut() else {
            return Ok(Step::Exhausted);
        };
        if !self.ctx.guard(stream.advance()).await? {
            tracing::trace!("stream exhausted");
            return Ok(Step::Exhausted);
        }
        let Some(doc) = stream.current() else {
            return Ok(Step::Exhausted);
        };

        // Field-tolerant rows are written through the field table only, clean
        // or not, so untagged fields keep their value either way.
        if self.policy == DecodePolicy::IgnoreField {
            let written = decode_fields(doc, target);
            tracing::trace!(written, "decoded document field by field");
            return Ok(Step::Filled);
        }
        match decode_document::<T>(doc) {
            Ok(value) => {
                *target = value;
                Ok(Step::Filled)
            }
            Err(err) => Ok(Step::Rejected(err)),
        }
    }
}
