use mongodb::{bson::Document, options::FindOptions, Collection};

use crate::mongo::context::QueryContext;
use crate::mongo::cursor::Cursor;
use crate::mongo::stream::DriverStream;
use crate::options::QueryOptions;

/// Run a find and wrap its result stream. A failed find yields a cursor that
/// reports the failure from every operation.
pub async fn find<T>(
    collection: &Collection<T>,
    filter: Document,
    find_options: Option<FindOptions>,
    options: &QueryOptions,
) -> Cursor<DriverStream<T>>
where
    T: Send + Sync,
{
    find_with_context(
        QueryContext::background(),
        collection,
        filter,
        find_options,
        options,
    )
    .await
}

pub async fn find_with_context<T>(
    ctx: QueryContext,
    collection: &Collection<T>,
    filter: Document,
    find_options: Option<FindOptions>,
    options: &QueryOptions,
) -> Cursor<DriverStream<T>>
where
    T: Send + Sync,
{
    let ctx = match options.timeout {
        Some(timeout) => ctx.with_timeout(timeout),
        None => ctx,
    };
    let stream = ctx
        .guard(async {
            let cursor = collection.find(filter, find_options).await?;
            Ok(DriverStream::new(cursor))
        })
        .await;
    if let Err(err) = &stream {
        tracing::debug!(collection = collection.name(), error = %err, "find failed");
    }
    Cursor::from_result(stream, ctx, options.decode_policy)
}
