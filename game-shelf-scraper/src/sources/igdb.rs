use game_shelf_core::GameMetadata;

use crate::client::JsonFetch;
use crate::credentials::IgdbCredentials;
use crate::error::ScrapeError;

// TODO: IGDB needs an OAuth token exchange with Twitch before any query;
// wire it up once `credentials.toml` carries a client secret.
pub async fn search<F: JsonFetch>(
    _http: &F,
    _creds: Option<&IgdbCredentials>,
    _query: &str,
) -> Result<Option<GameMetadata>, ScrapeError> {
    Err(ScrapeError::NotImplemented("IGDB lookup"))
}
