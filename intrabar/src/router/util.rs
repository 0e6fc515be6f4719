use intrabar_types::IntrabarError;

/// Join a collection of tasks and apply an optional request-level deadline.
///
/// On timeout this returns `RequestTimeout("request")`; call sites remap it to a more
/// specific capability label as needed.
pub async fn join_with_deadline<I, F, T>(
    tasks: I,
    deadline: Option<std::time::Duration>,
) -> Result<Vec<T>, IntrabarError>
where
    I: IntoIterator<Item = F>,
    F: core::future::Future<Output = T>,
{
    crate::core::with_request_deadline(
        "request",
        deadline,
        async { Ok(futures::future::join_all(tasks).await) },
    )
    .await
}
