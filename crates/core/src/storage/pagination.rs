//! Cursor-driven pagination shared by every list operation.

use std::future::Future;

use tokio_util::sync::CancellationToken;

use super::item::{Cursor, Page};
use super::{RepositoryError, Result};

/// Runs one store round-trip, giving up as soon as `cancel` fires.
pub async fn run_cancellable<T, Fut>(cancel: &CancellationToken, operation: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(RepositoryError::Cancelled),
        result = operation => result,
    }
}

/// Exhausts a paged read into a single sequence.
///
/// `fetch` is called with no cursor first, then with each returned cursor
/// until a page comes back without one. Items keep the order in which the
/// pages delivered them. Any error, including cancellation, discards the
/// pages collected so far.
pub async fn collect_pages<T, F, Fut>(cancel: &CancellationToken, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<Cursor>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut cursor = None;
    let mut pages = 0_usize;

    loop {
        let page = run_cancellable(cancel, fetch(cursor.take())).await?;
        pages += 1;
        items.extend(page.items);

        match page.next_cursor {
            Some(next) if !next.is_empty() => cursor = Some(next),
            _ => break,
        }
    }

    tracing::debug!(pages, items = items.len(), "Collected paged results");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::storage::item::{AttributeValue, Item};

    fn cursor(marker: &str) -> Cursor {
        Cursor::new(HashMap::from([(
            "id".to_string(),
            AttributeValue::S(marker.to_string()),
        )]))
    }

    #[tokio::test]
    async fn test_collects_all_pages_in_order() {
        let pages = vec![
            Page::with_cursor(vec![1, 2], cursor("a")),
            Page::with_cursor(vec![3], cursor("b")),
            Page::last(vec![4, 5]),
        ];
        let calls = AtomicUsize::new(0);

        let items = collect_pages(&CancellationToken::new(), |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            let page = pages[n].clone();
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1, 2, 3, 4, 5]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_passes_previous_cursor_to_next_fetch() {
        let seen: Mutex<Vec<Option<Cursor>>> = Mutex::new(Vec::new());

        let items = collect_pages(&CancellationToken::new(), |c: Option<Cursor>| {
            let page = match &c {
                None => Page::with_cursor(vec!["first"], cursor("a")),
                Some(_) => Page::last(vec!["second"]),
            };
            seen.lock().unwrap().push(c);
            async move { Ok(page) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec!["first", "second"]);
        assert_eq!(*seen.lock().unwrap(), vec![None, Some(cursor("a"))]);
    }

    #[tokio::test]
    async fn test_single_empty_page() {
        let items: Vec<u8> =
            collect_pages(&CancellationToken::new(), |_| async { Ok(Page::last(Vec::new())) })
                .await
                .unwrap();

        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_empty_cursor_ends_pagination() {
        let calls = AtomicUsize::new(0);

        let items = collect_pages(&CancellationToken::new(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(Page::with_cursor(vec![1], Cursor::new(Item::new()))) }
        })
        .await
        .unwrap();

        assert_eq!(items, vec![1]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_error_discards_partial_results() {
        let calls = AtomicUsize::new(0);

        let result: Result<Vec<u8>> = collect_pages(&CancellationToken::new(), |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Ok(Page::with_cursor(vec![1, 2], cursor("a")))
                } else {
                    Err(RepositoryError::QueryFailed("boom".to_string()))
                }
            }
        })
        .await;

        assert_eq!(
            result,
            Err(RepositoryError::QueryFailed("boom".to_string()))
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_cancellation_mid_pagination() {
        let cancel = CancellationToken::new();
        let calls = AtomicUsize::new(0);

        let result: Result<Vec<u8>> = collect_pages(&cancel, |_| {
            if calls.fetch_add(1, Ordering::SeqCst) == 1 {
                cancel.cancel();
            }
            async { Ok(Page::with_cursor(vec![1], cursor("more"))) }
        })
        .await;

        assert_eq!(result, Err(RepositoryError::Cancelled));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_run_cancellable_passes_result_through() {
        let result = run_cancellable(&CancellationToken::new(), async { Ok(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_run_cancellable_already_cancelled() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = run_cancellable(&cancel, async { Ok(7) }).await;
        assert_eq!(result, Err(RepositoryError::Cancelled));
    }
}
