//! Client for the local batch inpainting service.
//!
//! The service runs `iopaint` over an image folder and a mask folder and
//! writes the results to an output folder. Three routes matter here:
//! `POST /api/iopaint` runs a job, `GET /api/list-output` lists result files
//! and `GET /api/serve-image` returns one file's bytes. FastAPI reports
//! failures as a non-2xx status with a `{"detail": "..."}` body.
//!
//! Calls are blocking; the GUI runs them on a worker thread.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MaskError, Result};
use crate::settings::Settings;

const REQUEST_TIMEOUT_SECS: u64 = 600;
const CONNECT_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// JOB
// ============================================================================

/// One batch run: three folders plus the model options.
#[derive(Clone, Debug, PartialEq)]
pub struct InpaintJob {
    pub image_folder: String,
    pub mask_folder: String,
    pub output_folder: String,
    pub model: String,
    pub device: String,
    pub clear_output: bool,
}

impl InpaintJob {
    /// Build a job from the saved folder paths and model options. Refused
    /// when any folder is blank.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let job = Self {
            image_folder: settings.image_folder.trim().to_string(),
            mask_folder: settings.mask_folder.trim().to_string(),
            output_folder: settings.output_folder.trim().to_string(),
            model: settings.inpaint_model.clone(),
            device: settings.inpaint_device.clone(),
            clear_output: settings.clear_output,
        };
        job.validate()?;
        Ok(job)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("image folder", &self.image_folder),
            ("mask folder", &self.mask_folder),
            ("output folder", &self.output_folder),
        ] {
            if value.trim().is_empty() {
                return Err(MaskError::InvalidInput(format!("{name} path is empty")));
            }
        }
        Ok(())
    }

    /// The command line the service will execute, for display.
    pub fn command_preview(&self) -> String {
        let or = |s: &str, fallback: &str| if s.is_empty() { fallback.to_string() } else { s.to_string() };
        format!(
            "iopaint run --model={} --device={} \\\n  --image=\"{}\" \\\n  --mask=\"{}\" \\\n  --output=\"{}\"",
            self.model,
            self.device,
            or(&self.image_folder, "image"),
            or(&self.mask_folder, "mask"),
            or(&self.output_folder, "output"),
        )
    }
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Serialize)]
struct RunRequest<'a> {
    image_path: &'a str,
    mask_path: &'a str,
    output_path: &'a str,
    model: &'a str,
    device: &'a str,
    clear_output: bool,
}

impl<'a> From<&'a InpaintJob> for RunRequest<'a> {
    fn from(job: &'a InpaintJob) -> Self {
        Self {
            image_path: &job.image_folder,
            mask_path: &job.mask_folder,
            output_path: &job.output_folder,
            model: &job.model,
            device: &job.device,
            clear_output: job.clear_output,
        }
    }
}

/// Outcome of a run. `success == false` still means the service answered;
/// `error` then carries the tool's stderr.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct InpaintResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl InpaintResponse {
    /// One-line, user-facing summary.
    pub fn status_message(&self) -> String {
        if self.success {
            let msg: &str = if self.message.is_empty() { "Inpainting completed" } else { &self.message };
            format!("✅ {msg}")
        } else {
            let detail = self.error.as_deref().map(str::trim).filter(|e| !e.is_empty()).unwrap_or("unknown error");
            let msg: &str = if self.message.is_empty() { "Inpainting failed" } else { &self.message };
            format!("❌ {msg}: {detail}")
        }
    }
}

#[derive(Deserialize)]
struct ListOutputResponse {
    #[serde(default)]
    images: Vec<String>,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Map an error status and its body to [`MaskError::Remote`], preferring the
/// FastAPI `detail` field when the body carries one.
pub fn remote_error(status: u16, body: &str) -> MaskError {
    let detail = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.detail,
        Err(_) => body.trim().to_string(),
    };
    MaskError::Remote { status, detail }
}

/// Status line for the GUI from any run outcome.
pub fn status_for(result: &Result<InpaintResponse>) -> String {
    match result {
        Ok(resp) => resp.status_message(),
        Err(MaskError::Remote { detail, .. }) => format!("❌ {detail}"),
        Err(e) => format!("❌ {e}"),
    }
}

// ============================================================================
// CLIENT
// ============================================================================

pub struct InpaintClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl InpaintClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(&settings.inpaint_endpoint)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `route`, with `path` as an encoded query parameter
    /// when given.
    pub fn url(&self, route: &str, path: Option<&str>) -> Result<reqwest::Url> {
        let raw = format!("{}{}", self.base_url, route);
        let parsed = match path {
            Some(p) => reqwest::Url::parse_with_params(&raw, &[("path", p)]),
            None => reqwest::Url::parse(&raw),
        };
        parsed.map_err(|e| MaskError::InvalidInput(format!("bad service URL {raw}: {e}")))
    }

    pub fn run(&self, job: &InpaintJob) -> Result<InpaintResponse> {
        job.validate()?;
        log_info!(
            "Inpaint request: image={} mask={} output={} model={} device={}",
            job.image_folder,
            job.mask_folder,
            job.output_folder,
            job.model,
            job.device
        );
        let resp = self.http.post(self.url("/api/iopaint", None)?).json(&RunRequest::from(job)).send()?;
        let parsed: InpaintResponse = Self::check(resp)?.json()?;
        if parsed.success {
            log_info!("Inpaint finished: {}", parsed.message);
        } else {
            log_err!("Inpaint failed: {}", parsed.error.as_deref().unwrap_or(&parsed.message));
        }
        Ok(parsed)
    }

    /// Result files under `path`, as full paths, sorted by the service.
    pub fn list_output(&self, path: &str) -> Result<Vec<String>> {
        let resp = self.http.get(self.url("/api/list-output", Some(path))?).send()?;
        let parsed: ListOutputResponse = Self::check(resp)?.json()?;
        Ok(parsed.images)
    }

    /// Raw bytes of one result file.
    pub fn serve_image(&self, path: &str) -> Result<Vec<u8>> {
        let resp = self.http.get(self.url("/api/serve-image", Some(path))?).send()?;
        Ok(Self::check(resp)?.bytes()?.to_vec())
    }

    pub fn health(&self) -> Result<String> {
        let resp = self.http.get(self.url("/health", None)?).send()?;
        let parsed: HealthResponse = Self::check(resp)?.json()?;
        Ok(parsed.status)
    }

    fn check(resp: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().unwrap_or_default();
        let err = remote_error(status.as_u16(), &body);
        log_err!("Inpaint service error: {err}");
        Err(err)
    }
}

#[cfg(test)]
#[path = "inpaint_test.rs"]
mod inpaint_test;
