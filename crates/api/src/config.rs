use std::path::{Path, PathBuf};

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for running from the checkout on the
/// device itself. Override via environment variables or a `.env` file.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins from comma-separated `CORS_ORIGINS`; `*` allows any.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `120`, uploads and PDF
    /// conversion on a Pi can be slow).
    pub request_timeout_secs: u64,
    /// Directory holding the JSON documents, `uploads/` and `converted/`.
    pub data_dir: PathBuf,
    /// Directory holding the logo and `widgets/`.
    pub static_dir: PathBuf,
    /// Built admin/display frontend, served when it exists.
    pub frontend_dist: PathBuf,
    /// PDF rasterizer binary (default: `pdftoppm`).
    pub pdf_rasterizer: String,
    /// Wall-clock limit for one PDF conversion in seconds (default: `60`).
    pub pdf_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default              |
    /// |------------------------|----------------------|
    /// | `HOST`                 | `0.0.0.0`            |
    /// | `PORT`                 | `3000`               |
    /// | `CORS_ORIGINS`         | `*`                  |
    /// | `REQUEST_TIMEOUT_SECS` | `120`                |
    /// | `DATA_DIR`             | `.`                  |
    /// | `STATIC_DIR`           | `$DATA_DIR/static`   |
    /// | `FRONTEND_DIST`        | `frontend/dist`      |
    /// | `PDF_RASTERIZER`       | `pdftoppm`           |
    /// | `PDF_TIMEOUT_SECS`     | `60`                 |
    ///
    /// Relative directories are resolved against the working directory so
    /// stored file paths are absolute.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let data_dir = absolute(std::env::var("DATA_DIR").unwrap_or_else(|_| ".".into()));

        let static_dir = std::env::var("STATIC_DIR")
            .map(absolute)
            .unwrap_or_else(|_| data_dir.join("static"));

        let frontend_dist =
            absolute(std::env::var("FRONTEND_DIST").unwrap_or_else(|_| "frontend/dist".into()));

        let pdf_rasterizer =
            std::env::var("PDF_RASTERIZER").unwrap_or_else(|_| "pdftoppm".into());

        let pdf_timeout_secs: u64 = std::env::var("PDF_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("PDF_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            data_dir,
            static_dir,
            frontend_dist,
            pdf_rasterizer,
            pdf_timeout_secs,
        }
    }

    /// Whether the CORS configuration allows any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

fn absolute(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .expect("Failed to read the working directory")
            .join(path)
    }
}
