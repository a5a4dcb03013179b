//! Info command implementation

use serde::Serialize;

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::{load_config, GanSpec, InfoArgs, OutputFormat};
use crate::generative::{Discriminator, Generator};
use crate::nn::LayerSummary;

/// Layer-by-layer plan of both networks
#[derive(Debug, Serialize)]
pub struct ArchitectureReport {
    pub image_size: usize,
    pub latent_dim: usize,
    pub generator: Vec<LayerSummary>,
    pub generator_parameters: usize,
    pub discriminator: Vec<LayerSummary>,
    pub discriminator_parameters: usize,
}

impl ArchitectureReport {
    /// Build both networks and record their layer plans
    pub fn from_spec(spec: &GanSpec) -> crate::Result<Self> {
        let config = spec.gan_config();
        let generator = Generator::with_seed(config.generator, 0)?;
        let discriminator = Discriminator::with_seed(config.discriminator, 0)?;
        Ok(Self {
            image_size: spec.data.image_size,
            latent_dim: spec.model.latent_dim,
            generator: generator.summary(),
            generator_parameters: generator.num_parameters(),
            discriminator: discriminator.summary(),
            discriminator_parameters: discriminator.num_parameters(),
        })
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (title, layers, params) in [
            ("Generator", &self.generator, self.generator_parameters),
            ("Discriminator", &self.discriminator, self.discriminator_parameters),
        ] {
            out.push_str(&format!("{title} ({params} parameters)\n"));
            for layer in layers {
                out.push_str(&format!(
                    "  {:<16} {:<18} {:>10}\n",
                    layer.name,
                    format!("{:?}", layer.output_shape),
                    layer.params
                ));
            }
        }
        out
    }
}

pub fn run_info(args: InfoArgs, level: LogLevel) -> Result<(), String> {
    let spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    let report = ArchitectureReport::from_spec(&spec).map_err(|e| format!("Architecture error: {e}"))?;

    match args.format {
        OutputFormat::Text => {
            log(level, LogLevel::Normal, "Architecture Info:");
            println!();
            println!("Image size: {0}×{0}×3, latent dim: {1}", report.image_size, report.latent_dim);
            print!("{}", report.to_text());
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&report).map_err(|e| format!("JSON serialization error: {e}"))?;
            println!("{json}");
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&report).map_err(|e| format!("YAML serialization error: {e}"))?;
            println!("{yaml}");
        }
    }

    Ok(())
}
