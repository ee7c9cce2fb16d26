use super::*;
use crate::error::MaskError;

fn no_client() -> Result<InpaintClient> {
    Err(MaskError::InvalidInput("bad endpoint".into()))
}

fn job() -> InpaintJob {
    InpaintJob {
        image_folder: "/in".into(),
        mask_folder: "/masks".into(),
        output_folder: "/out".into(),
        model: "lama".into(),
        device: "cpu".into(),
        clear_output: false,
    }
}

// =============================================================
// Client failures keep the result kind of the job
// =============================================================

#[test]
fn failed_client_fails_a_run_as_a_run() {
    let out = ServiceJob::Run(job()).execute(no_client(), "http://svc");
    assert!(matches!(out, ServiceResult::Ran(Err(MaskError::InvalidInput(_)))));
}

#[test]
fn failed_client_fails_a_listing_as_a_listing() {
    let out = ServiceJob::List("/out".into()).execute(no_client(), "http://svc");
    assert!(matches!(out, ServiceResult::Listed(Err(_))));
}

#[test]
fn failed_client_keeps_the_download_target() {
    let dest = PathBuf::from("/tmp/result.png");
    let out = ServiceJob::Fetch { remote: "/out/a.png".into(), dest: dest.clone() }.execute(no_client(), "http://svc");
    match out {
        ServiceResult::Fetched { dest: got, result } => {
            assert_eq!(got, dest);
            assert!(result.is_err());
        }
        _ => panic!("download must report as a download"),
    }
}

#[test]
fn failed_client_reports_health_for_the_endpoint() {
    let out = ServiceJob::Health.execute(no_client(), "http://svc:8080");
    match out {
        ServiceResult::Health { url, result } => {
            assert_eq!(url, "http://svc:8080");
            assert!(result.is_err());
        }
        _ => panic!("health check must report as a health check"),
    }
}
