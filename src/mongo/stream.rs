use std::future::Future;

use mongodb::bson::RawDocument;

use crate::error::Result;

/// A forward-only, single-owner handle on a server-side result set.
pub trait DocumentStream: Send {
    /// Move to the next document. `Ok(false)` once the stream is exhausted or
    /// closed.
    fn advance(&mut self) -> impl Future<Output = Result<bool>> + Send;

    /// The document the last successful `advance` moved onto.
    fn current(&self) -> Option<&RawDocument>;

    /// Release the server-side resource. Closing twice is not an error.
    fn close(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// [`DocumentStream`] over the driver's own cursor.
pub struct DriverStream<T> {
    cursor: Option<mongodb::Cursor<T>>,
    positioned: bool,
}

impl<T> DriverStream<T> {
    pub fn new(cursor: mongodb::Cursor<T>) -> Self {
        Self {
            cursor: Some(cursor),
            positioned: false,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.cursor.is_none()
    }
}

impl<T> From<mongodb::Cursor<T>> for DriverStream<T> {
    fn from(cursor: mongodb::Cursor<T>) -> Self {
        Self::new(cursor)
    }
}

impl<T: Send + Sync> DocumentStream for DriverStream<T> {
    async fn advance(&mut self) -> Result<bool> {
        self.positioned = false;
        let Some(cursor) = self.cursor.as_mut() else {
            return Ok(false);
        };
        self.positioned = cursor.advance().await?;
        Ok(self.positioned)
    }

    fn current(&self) -> Option<&RawDocument> {
        match (&self.cursor, self.positioned) {
            (Some(cursor), true) => Some(cursor.current()),
            _ => None,
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.positioned = false;
        // The driver kills the server cursor when its handle is dropped.
        if self.cursor.take().is_some() {
            tracing::trace!("driver cursor released");
        }
        Ok(())
    }
}
