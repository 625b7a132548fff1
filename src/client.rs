use super::api::{
    CreateFileRequest, LoginInfo, LoginRequest, UploadDescriptor, UploadSlot, AUTH_HEADER,
    CREATE_FILE_PATH, LOGIN_PATH,
};
use super::config::ClientConfig;
use super::error::{Error, Result, Step};
use super::upload::{self, ProgressListener};
use log::{debug, info};
use reqwest::{
    header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE},
    RequestBuilder, Response, StatusCode,
};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Client for the T1 Disk upload API.
///
/// Every operation takes the token explicitly. Use [`Client::login_session`]
/// or [`Client::session`] to get a [`Session`] that carries it instead.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(Error::Client)?;

        Ok(Client { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Exchanges credentials for a token.
    pub async fn login(&self, login: &str, password: &str) -> Result<LoginInfo> {
        let url = self.config.endpoint(LOGIN_PATH);
        debug!("POST {}", url);

        let request = self.http.post(&url).json(&LoginRequest {
            login,
            password,
            permanent_auth: self.config.is_permanent_auth(),
        });

        let response = send(request, Step::Login).await?;
        decode(response, Step::Login).await
    }

    /// Asks for an upload slot for `remote_path`.
    pub async fn get_upload_url(
        &self,
        remote_path: &str,
        token: &str,
        multipart: bool,
    ) -> Result<UploadDescriptor> {
        let url = self.config.endpoint(CREATE_FILE_PATH);
        debug!("POST {} path={} multipart={}", url, remote_path, multipart);

        let request = self
            .http
            .post(&url)
            .header(AUTH_HEADER, auth_value(token)?)
            .json(&CreateFileRequest {
                path: remote_path,
                multipart,
            });

        let response = send(request, Step::CreateUpload).await?;
        let slot: UploadSlot = decode(response, Step::CreateUpload).await?;
        Ok(slot.into_descriptor())
    }

    /// PUTs the content of `local_path` to `upload_url`.
    pub async fn upload_file(
        &self,
        upload_url: &str,
        content_type: &str,
        local_path: impl AsRef<Path>,
        token: &str,
    ) -> Result<()> {
        self.upload_file_with_progress(upload_url, content_type, local_path, token, None)
            .await
    }

    pub async fn upload_file_with_progress(
        &self,
        upload_url: &str,
        content_type: &str,
        local_path: impl AsRef<Path>,
        token: &str,
        progress_listener: Option<ProgressListener>,
    ) -> Result<()> {
        let auth = auth_value(token)?;
        let file = upload::open(local_path.as_ref(), progress_listener).await?;
        debug!("PUT {} ({} bytes, {})", upload_url, file.len, content_type);

        let request = self
            .http
            .put(upload_url)
            .header(CONTENT_TYPE, content_type)
            .header(AUTH_HEADER, auth)
            .header(CONTENT_LENGTH, file.len)
            .body(file.body);

        send(request, Step::Upload).await?;
        Ok(())
    }

    /// Finalizes an upload. Until this succeeds the server treats it as incomplete.
    pub async fn confirm_upload(&self, confirm_url: &str, token: &str) -> Result<()> {
        debug!("POST {}", confirm_url);

        let request = self.http.post(confirm_url).header(AUTH_HEADER, auth_value(token)?);

        send(request, Step::Confirm).await?;
        Ok(())
    }

    /// Runs get upload url, upload and confirm for one file, stopping at the
    /// first failure. Nothing is rolled back: an unconfirmed upload is left to
    /// the server.
    pub async fn upload_to_t1disk(
        &self,
        remote_path: &str,
        local_path: impl AsRef<Path>,
        token: &str,
        multipart: bool,
    ) -> Result<UploadDescriptor> {
        self.upload_to_t1disk_with_progress(remote_path, local_path, token, multipart, None)
            .await
    }

    pub async fn upload_to_t1disk_with_progress(
        &self,
        remote_path: &str,
        local_path: impl AsRef<Path>,
        token: &str,
        multipart: bool,
        progress_listener: Option<ProgressListener>,
    ) -> Result<UploadDescriptor> {
        let descriptor = self.get_upload_url(remote_path, token, multipart).await?;

        self.upload_file_with_progress(
            &descriptor.upload_url,
            &descriptor.content_type,
            local_path,
            token,
            progress_listener,
        )
        .await?;

        self.confirm_upload(&descriptor.confirm_url, token).await?;

        info!("uploaded {}", remote_path);
        Ok(descriptor)
    }

    /// Logs in and keeps the token for the following calls.
    pub async fn login_session(self, login: &str, password: &str) -> Result<Session> {
        let info = self.login(login, password).await?;
        Ok(Session {
            token: info.token.clone(),
            info: Some(info),
            client: self,
        })
    }

    /// Wraps a token obtained elsewhere.
    pub fn session(self, token: impl Into<String>) -> Session {
        Session {
            client: self,
            token: token.into(),
            info: None,
        }
    }
}

/// A [`Client`] bound to one token.
///
/// The token never changes for the lifetime of a session; log in again to get
/// a new one.
#[derive(Clone)]
pub struct Session {
    client: Client,
    token: String,
    info: Option<LoginInfo>,
}

impl Session {
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Login response metadata, if this session came from [`Client::login_session`].
    pub fn info(&self) -> Option<&LoginInfo> {
        self.info.as_ref()
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub async fn get_upload_url(&self, remote_path: &str, multipart: bool) -> Result<UploadDescriptor> {
        self.client
            .get_upload_url(remote_path, &self.token, multipart)
            .await
    }

    pub async fn upload_file(
        &self,
        upload_url: &str,
        content_type: &str,
        local_path: impl AsRef<Path>,
    ) -> Result<()> {
        self.client
            .upload_file(upload_url, content_type, local_path, &self.token)
            .await
    }

    pub async fn confirm_upload(&self, confirm_url: &str) -> Result<()> {
        self.client.confirm_upload(confirm_url, &self.token).await
    }

    pub async fn upload_to_t1disk(
        &self,
        remote_path: &str,
        local_path: impl AsRef<Path>,
        multipart: bool,
    ) -> Result<UploadDescriptor> {
        self.client
            .upload_to_t1disk(remote_path, local_path, &self.token, multipart)
            .await
    }

    pub async fn upload_to_t1disk_with_progress(
        &self,
        remote_path: &str,
        local_path: impl AsRef<Path>,
        multipart: bool,
        progress_listener: Option<ProgressListener>,
    ) -> Result<UploadDescriptor> {
        self.client
            .upload_to_t1disk_with_progress(
                remote_path,
                local_path,
                &self.token,
                multipart,
                progress_listener,
            )
            .await
    }
}

fn auth_value(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(token).map_err(|_| Error::InvalidToken)?;
    value.set_sensitive(true);
    Ok(value)
}

async fn send(request: RequestBuilder, step: Step) -> Result<Response> {
    let response = request
        .send()
        .await
        .map_err(|source| Error::Transport { step, source })?;

    let status = response.status();
    if status != StatusCode::OK {
        debug!("{} failed with {}", step, status);
        return Err(Error::Status { step, status });
    }

    Ok(response)
}

async fn decode<T: DeserializeOwned>(response: Response, step: Step) -> Result<T> {
    let body = response
        .text()
        .await
        .map_err(|source| Error::Transport { step, source })?;

    serde_json::from_str(&body).map_err(|source| Error::Decode { step, source, body })
}
