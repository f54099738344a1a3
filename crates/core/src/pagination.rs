//! Pagination over list endpoints
//!
//! Drives a [`Transport`] across successive pages until the remote side says
//! there are no more, collecting items in arrival order.

use std::collections::HashSet;

use tracing::{debug, instrument, warn};
use vendorlink_domain::constants::PAGE_CURSOR_PARAM;
use vendorlink_domain::{ApiRequest, Continuation, Page, Record, Result, VendorLinkError};

use crate::ports::Transport;

/// Walks every page of a list endpoint.
pub struct Paginator<'a> {
    transport: &'a dyn Transport,
}

impl<'a> Paginator<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self { transport }
    }

    /// Fetch every item of `path`, in page order.
    ///
    /// # Errors
    /// Propagates the first transport or decoding failure unchanged; items
    /// collected from earlier pages are discarded. A continuation token that
    /// was already followed fails with `MalformedResponse`.
    pub async fn list_all(&self, path: &str) -> Result<Vec<Record>> {
        self.list_all_with(path, &[]).await
    }

    /// Like [`Paginator::list_all`], with extra query parameters sent on every
    /// page request.
    ///
    /// # Errors
    /// See [`Paginator::list_all`].
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn list_all_with(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<Record>> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_number: u64 = 0;
        let mut followed: HashSet<String> = HashSet::new();

        loop {
            let mut request = ApiRequest::get(path);
            for (key, value) in query {
                request = request.with_query(*key, *value);
            }
            if let Some(cursor) = &cursor {
                request = request.with_query(PAGE_CURSOR_PARAM, cursor.clone());
            }

            let response = self.transport.execute(request).await?;
            let page = Page::from_body(response.body)?;
            let received = page.items.len();
            debug!(page = page_number, received, next = ?page.next, "received page");

            if page.is_empty() {
                break;
            }
            items.extend(page.items);
            page_number += 1;

            cursor = match page.next {
                Continuation::Done => break,
                Continuation::Token(token) => {
                    if !followed.insert(token.clone()) {
                        warn!(page = page_number, token = %token, "continuation token repeated");
                        return Err(VendorLinkError::MalformedResponse(format!(
                            "continuation token '{token}' was already followed"
                        )));
                    }
                    Some(token)
                }
                Continuation::More => Some(page_number.to_string()),
            };
        }

        debug!(pages = page_number, total = items.len(), "pagination complete");
        Ok(items)
    }
}
