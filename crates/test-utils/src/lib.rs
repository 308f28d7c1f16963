use anyhow::Result;
use bookpipe::StdinTransform;
use std::fs;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// --- Fixtures ---

/// Two-book page as a scraping collaborator would print it.
pub const CANNED_PAGE_JSON: &str = r#"{"books":[{"available":true,"image":"a.jpg","name":"Book A","price":9.99,"rating":4,"url":"http://x/a","urls":["a1.jpg"]},{"available":false,"image":"b.jpg","name":"Book B","price":15.5,"rating":2,"url":"http://x/b","urls":[]}]}"#;

/// Text rendering of the two books in [`CANNED_PAGE_JSON`].
pub const CANNED_BOOK_A_LINE: &str = "{true a.jpg Book A 9.99 4 http://x/a [a1.jpg]}";
pub const CANNED_BOOK_B_LINE: &str = "{false b.jpg Book B 15.5 2 http://x/b []}";

pub const CATALOGUE_PATH: &str = "/catalogue/page-3.html";

pub const SAMPLE_HTML: &str = r#"<html><body><section><div><ol class="row"><li><h3><a title="Book A">Book A</a></h3></li></ol></div></section></body></html>"#;

// --- Mock Catalogue ---

/// Starts a mock server answering `GET /catalogue/page-3.html` with `html`.
pub async fn start_catalogue(status: u16, html: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CATALOGUE_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_string(html))
        .mount(&server)
        .await;
    server
}

/// Full URL of the catalogue page on a mock server.
pub fn catalogue_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), CATALOGUE_PATH)
}

/// A local URL nothing listens on, for connection-refused failures.
pub fn unreachable_url() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(format!("http://127.0.0.1:{port}{CATALOGUE_PATH}"))
}

// --- Scripted Transform ---

/// A shell script standing in for the scraping collaborator.
///
/// It records whatever arrives on stdin, prints a fixed stdout and exits with
/// a fixed code. The script and its capture live in a temporary directory
/// that is removed when this value is dropped.
pub struct ScriptedTransform {
    dir: TempDir,
    script: PathBuf,
}

impl ScriptedTransform {
    pub fn new(stdout: &str, exit_code: i32) -> Result<Self> {
        let dir = tempdir()?;
        let fixture = dir.path().join("stdout.fixture");
        let capture = dir.path().join("stdin.capture");
        fs::write(&fixture, stdout)?;

        let script = dir.path().join("transform.sh");
        let body = format!(
            "#!/bin/sh\ncat > '{capture}'\ncat '{fixture}'\nif [ {code} -ne 0 ]; then echo 'scrape failed' >&2; fi\nexit {code}\n",
            capture = capture.display(),
            fixture = fixture.display(),
            code = exit_code,
        );
        fs::write(&script, body)?;
        Ok(Self { dir, script })
    }

    /// Runs the script through `sh`, so no executable bit is needed.
    pub fn transform(&self) -> StdinTransform {
        StdinTransform::new("sh", vec![self.script.display().to_string()])
    }

    pub fn script_path(&self) -> &Path {
        &self.script
    }

    /// Bytes the script received on stdin, `None` if it never ran.
    pub fn received_stdin(&self) -> Option<Vec<u8>> {
        fs::read(self.dir.path().join("stdin.capture")).ok()
    }

    pub fn was_invoked(&self) -> bool {
        self.received_stdin().is_some()
    }
}
