use serde::Deserialize;

/* Password grant response; `token_type`, `expires_in` and friends are ignored */
#[derive(Debug, Deserialize)]
pub struct Token {
    pub access_token: String,
}
