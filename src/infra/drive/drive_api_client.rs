// =============================================================================
// GOOGLE DRIVE CLIENT WITH SERVICE ACCOUNT AUTHENTICATION
// =============================================================================
//
// Lists and downloads the PDF children of a Drive folder via the Drive v3
// REST API.
//
// **Setup:**
//
// 1. Create a service account in Google Cloud Console and enable the
//    Google Drive API for the project.
// 2. Create a JSON key for the service account and save it locally.
// 3. Share the Drive folder with the service account email
//    (looks like: name@project.iam.gserviceaccount.com).
// 4. Point the `GOOGLE_CREDENTIALS` environment variable at the key file.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::core::drive::{DriveClient, DriveError, RemoteDocument};

const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";
const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

// =============================================================================
// SERVICE ACCOUNT AUTHENTICATION
// =============================================================================

/// Service account credentials from the JSON key file.
#[derive(Debug, Clone, Deserialize)]
struct ServiceAccountCredentials {
    /// The service account email (used as issuer in JWT).
    client_email: String,

    /// The private key in PEM format.
    private_key: String,

    /// The token URI (where to exchange JWT for an access token).
    token_uri: String,
}

/// JWT claims for Google OAuth2.
#[derive(Debug, Serialize)]
struct JwtClaims {
    /// Issuer (service account email).
    iss: String,

    /// Scope (what APIs we want access to).
    scope: String,

    /// Audience (token endpoint).
    aud: String,

    /// Issued at (Unix timestamp).
    iat: u64,

    /// Expiration (Unix timestamp, max 1 hour from iat).
    exp: u64,
}

/// Response from Google's token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Cached access token with expiration.
struct CachedToken {
    token: String,
    expires_at: SystemTime,
}

/// Authenticator that handles OAuth2 with service account credentials.
pub struct ServiceAccountAuth {
    credentials: ServiceAccountCredentials,
    client: Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl ServiceAccountAuth {
    /// Creates a new authenticator from a JSON key file path.
    pub async fn from_file(path: &Path) -> Result<Self, DriveError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DriveError::Auth(format!("Failed to read credentials file: {e}")))?;
        Self::from_json(&content)
    }

    /// Creates a new authenticator from JSON key content.
    pub fn from_json(json: &str) -> Result<Self, DriveError> {
        let credentials: ServiceAccountCredentials = serde_json::from_str(json)
            .map_err(|e| DriveError::Auth(format!("Invalid credentials file: {e}")))?;
        Ok(Self {
            credentials,
            client: Client::new(),
            cached_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Gets a valid access token, refreshing if necessary.
    pub async fn get_access_token(&self) -> Result<String, DriveError> {
        // Check if we have a valid cached token
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if token.expires_at > SystemTime::now() + Duration::from_secs(60) {
                    return Ok(token.token.clone());
                }
            }
        }

        // Need to refresh the token
        let new_token = self.fetch_new_token().await?;

        // Cache it
        {
            let mut cached = self.cached_token.write().await;
            *cached = Some(CachedToken {
                token: new_token.clone(),
                expires_at: SystemTime::now() + Duration::from_secs(55 * 60),
            });
        }

        Ok(new_token)
    }

    /// Fetches a new access token from Google.
    async fn fetch_new_token(&self) -> Result<String, DriveError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| DriveError::Auth(e.to_string()))?
            .as_secs();

        let claims = JwtClaims {
            iss: self.credentials.client_email.clone(),
            scope: DRIVE_SCOPE.to_string(),
            aud: self.credentials.token_uri.clone(),
            iat: now,
            exp: now + 3600,
        };

        let header = Header::new(Algorithm::RS256);
        let key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())
            .map_err(|e| DriveError::Auth(format!("Invalid private key: {e}")))?;
        let jwt = encode(&header, &claims, &key).map_err(|e| DriveError::Auth(e.to_string()))?;

        let response = self
            .client
            .post(&self.credentials.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", &jwt),
            ])
            .send()
            .await
            .map_err(|e| DriveError::Auth(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| DriveError::Auth(e.to_string()))?;
            return Err(DriveError::Auth(format!(
                "Token exchange failed ({status}): {text}"
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| DriveError::Auth(e.to_string()))?;
        Ok(token_response.access_token)
    }
}

// =============================================================================
// DRIVE API RESPONSE STRUCTURES
// =============================================================================

#[derive(Debug, Deserialize)]
struct FileListResponse {
    #[serde(default)]
    files: Vec<ApiFile>,
}

#[derive(Debug, Deserialize)]
struct ApiFile {
    id: Option<String>,
    name: Option<String>,
}

/// Query selecting the immediate PDF children of a folder.
fn pdf_children_query(folder_id: &str) -> String {
    format!("'{}' in parents and mimeType='application/pdf'", folder_id)
}

fn to_documents(listing: FileListResponse) -> Vec<RemoteDocument> {
    listing
        .files
        .into_iter()
        .filter_map(|f| match (f.id, f.name) {
            (Some(id), Some(name)) => Some(RemoteDocument { id, name }),
            _ => None,
        })
        .collect()
}

// =============================================================================
// DRIVE CLIENT
// =============================================================================

/// Minimal Google Drive v3 client. It deliberately exposes only the calls the
/// fetch pass needs.
pub struct DriveApiClient {
    client: Client,
    auth: ServiceAccountAuth,
    base_url: String,
}

impl DriveApiClient {
    pub fn new(auth: ServiceAccountAuth) -> Self {
        Self {
            client: Client::new(),
            auth,
            base_url: DRIVE_API_BASE.to_string(),
        }
    }
}

#[async_trait]
impl DriveClient for DriveApiClient {
    async fn list_pdfs(&self, folder_id: &str) -> Result<Vec<RemoteDocument>, DriveError> {
        let token = self.auth.get_access_token().await?;
        let url = format!("{}/files", self.base_url);
        let query = pdf_children_query(folder_id);

        tracing::debug!("Listing PDFs in folder {}", folder_id);

        let response = self
            .client
            .get(&url)
            .query(&[("q", query.as_str()), ("fields", "files(id, name)")])
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| DriveError::Api(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| DriveError::Api(e.to_string()))?;
            return Err(DriveError::Api(format!(
                "File listing failed ({status}): {text}. \
                 Make sure the folder is shared with your service account email."
            )));
        }

        let listing: FileListResponse = response
            .json()
            .await
            .map_err(|e| DriveError::Api(e.to_string()))?;

        Ok(to_documents(listing))
    }

    async fn download(&self, file_id: &str) -> Result<Vec<u8>, DriveError> {
        let token = self.auth.get_access_token().await?;
        let url = format!("{}/files/{}", self.base_url, file_id);

        tracing::debug!("Downloading file {}", file_id);

        let mut response = self
            .client
            .get(&url)
            .query(&[("alt", "media")])
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await
            .map_err(|e| DriveError::Api(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| DriveError::Api(e.to_string()))?;
            return Err(DriveError::Api(format!(
                "Download of {file_id} failed ({status}): {text}"
            )));
        }

        // Pull the body chunk by chunk until the transfer reports completion.
        let mut bytes = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| DriveError::Api(e.to_string()))?
        {
            bytes.extend_from_slice(&chunk);
        }

        Ok(bytes)
    }
}
