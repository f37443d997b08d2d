//! Process configuration, read from flags or the environment.

use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_CLASS_NAMES: [&str; 5] = ["Acne", "Eczema", "Melanoma", "Psoriasis", "Rosacea"];
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

#[derive(Parser, Debug, Clone)]
#[command(name = "dermascan")]
#[command(version)]
#[command(about = "Skin-lesion classification over HTTP", long_about = None)]
pub struct Settings {
    /// Address the HTTP server binds to
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8000")]
    pub bind: String,

    /// Path to the network JSON artifact
    #[arg(long, env = "MODEL_PATH", default_value = "model/skin_model.json")]
    pub model_path: PathBuf,

    /// Edge length images are resized to before inference
    #[arg(long, env = "IMAGE_SIZE", default_value_t = 224,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub image_size: u32,

    /// Class labels in model output order (comma separated)
    #[arg(long, env = "CLASS_NAMES", value_delimiter = ',',
          default_values_t = DEFAULT_CLASS_NAMES.map(String::from).to_vec())]
    pub class_names: Vec<String>,

    /// Origins allowed to call the API from a browser (comma separated)
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',',
          default_values_t = DEFAULT_CORS_ORIGINS.map(String::from).to_vec())]
    pub cors_origins: Vec<String>,

    /// Number of request worker threads (defaults to available parallelism)
    #[arg(long, env = "WORKERS")]
    pub workers: Option<usize>,
}

impl Settings {
    pub fn worker_count(&self) -> usize {
        self.workers
            .filter(|&n| n > 0)
            .or_else(|| std::thread::available_parallelism().ok().map(|n| n.get()))
            .unwrap_or(4)
    }

    pub fn allows_origin(&self, origin: &str) -> bool {
        self.cors_origins.iter().any(|o| o == origin)
    }
}
