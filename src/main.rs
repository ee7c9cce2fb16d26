// MaskFE is linked as a GUI-subsystem binary, so Windows never opens a console.
// Headless runs (--base/-b) borrow the console of the shell that launched them.
#![windows_subsystem = "windows"]

use std::process::ExitCode;

use clap::Parser;
use eframe::egui;
use maskfe::app::MaskFEApp;
use maskfe::{cli, log_err, log_info, logger};

fn main() -> ExitCode {
    let headless = cli::CliArgs::is_cli_mode();
    #[cfg(target_os = "windows")]
    if headless {
        console::attach_to_parent();
    }

    logger::init();

    if headless {
        log_info!("headless run: {:?}", std::env::args().skip(1).collect::<Vec<_>>());
        return cli::run(cli::CliArgs::parse());
    }

    log_info!("starting GUI");
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("MaskFE"),
        ..Default::default()
    };
    match eframe::run_native("MaskFE", options, Box::new(|cc| Box::new(MaskFEApp::new(cc)))) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_err!("window failed: {e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(target_os = "windows")]
mod console {
    use std::ffi::c_void;

    unsafe extern "system" {
        fn AttachConsole(process_id: u32) -> i32;
        fn SetStdHandle(std_handle: u32, handle: isize) -> i32;
        fn CreateFileW(
            name: *const u16,
            access: u32,
            share_mode: u32,
            security: *const c_void,
            disposition: u32,
            flags: u32,
            template: isize,
        ) -> isize;
    }

    const ATTACH_PARENT_PROCESS: u32 = u32::MAX;
    const GENERIC_WRITE: u32 = 0x4000_0000;
    const SHARE_READ_WRITE: u32 = 0x3;
    const OPEN_EXISTING: u32 = 3;
    const INVALID_HANDLE: isize = -1;
    // (DWORD)-11 and (DWORD)-12
    const STD_OUTPUT: u32 = -11i32 as u32;
    const STD_ERROR: u32 = -12i32 as u32;

    /// Attach to the parent console and point stdout/stderr at `CONOUT$`.
    /// Without the reopen, `println!` writes nowhere under the GUI subsystem.
    pub fn attach_to_parent() {
        let conout: Vec<u16> = "CONOUT$".encode_utf16().chain(Some(0)).collect();
        unsafe {
            if AttachConsole(ATTACH_PARENT_PROCESS) == 0 {
                return;
            }
            let out = CreateFileW(
                conout.as_ptr(),
                GENERIC_WRITE,
                SHARE_READ_WRITE,
                std::ptr::null(),
                OPEN_EXISTING,
                0,
                0,
            );
            if out == INVALID_HANDLE {
                return;
            }
            for std_handle in [STD_OUTPUT, STD_ERROR] {
                SetStdHandle(std_handle, out);
            }
        }
    }
}
