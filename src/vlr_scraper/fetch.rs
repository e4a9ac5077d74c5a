use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::RetryPolicy;
use crate::error::{Result, VlrError};
use crate::vlr_scraper::get_body;

/// GET `url`, retrying transient transport failures.
///
/// Returns `Ok(None)` for any status other than `200 OK`: the page has no data.
/// Once every attempt has failed transiently the last error is wrapped in
/// [`VlrError::RetriesExhausted`].
pub(crate) async fn fetch_with_retry(
    client: &reqwest::Client,
    url: &str,
    policy: &RetryPolicy,
) -> Result<Option<String>> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match get_body(client, url).await {
            Ok(body) => return Ok(Some(body)),
            Err(VlrError::UnexpectedStatus { status, .. }) => {
                debug!(url, %status, "no data for page");
                return Ok(None);
            }
            Err(e) if e.is_transient() && attempt < max_attempts => {
                warn!(url, attempt, max_attempts, error = %e, "transient failure, retrying");
                sleep(policy.delay()).await;
                attempt += 1;
            }
            Err(e) if e.is_transient() => {
                return Err(VlrError::RetriesExhausted {
                    url: url.to_owned(),
                    attempts: attempt,
                    source: Box::new(e),
                });
            }
            Err(e) => return Err(e),
        }
    }
}
