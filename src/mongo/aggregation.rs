use mongodb::{bson::Document, options::AggregateOptions, Collection};

use crate::mongo::context::QueryContext;
use crate::mongo::cursor::Cursor;
use crate::mongo::stream::DriverStream;
use crate::options::QueryOptions;

/// Run an aggregation pipeline and wrap its result stream.
pub async fn aggregate<T>(
    collection: &Collection<T>,
    pipeline: Vec<Document>,
    aggregate_options: Option<AggregateOptions>,
    options: &QueryOptions,
) -> Cursor<DriverStream<Document>>
where
    T: Send + Sync,
{
    aggregate_with_context(
        QueryContext::background(),
        collection,
        pipeline,
        aggregate_options,
        options,
    )
    .await
}

pub async fn aggregate_with_context<T>(
    ctx: QueryContext,
    collection: &Collection<T>,
    pipeline: Vec<Document>,
    aggregate_options: Option<AggregateOptions>,
    options: &QueryOptions,
) -> Cursor<DriverStream<Document>>
where
    T: Send + Sync,
{
    let ctx = match options.timeout {
        Some(timeout) => ctx.with_timeout(timeout),
        None => ctx,
    };
    let stream = ctx
        .guard(async {
            let cursor = collection.aggregate(pipeline, aggregate_options).await?;
            Ok(DriverStream::new(cursor))
        })
        .await;
    if let Err(err) = &stream {
        tracing::debug!(collection = collection.name(), error = %err, "aggregate failed");
    }
    Cursor::from_result(stream, ctx, options.decode_policy)
}
