use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use minijinja::Environment;
use structopt::StructOpt;

use fireutil::Timer;
use risk_data::Dataset;

use crate::cors::parse_origin;
use crate::templates;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "firemap",
    about = "Serves an interactive map of fire risk scores for buildings in Amsterdam"
)]
pub struct Flags {
    /// The directory holding the four CSV files
    #[structopt(long, default_value = "data")]
    pub data_dir: String,
    /// The port to listen on
    #[structopt(long, default_value = "5000")]
    pub port: u16,
    /// The address to listen on
    #[structopt(long, default_value = "127.0.0.1")]
    pub bind: IpAddr,
    /// Sent as Access-Control-Allow-Origin on every response
    #[structopt(long, default_value = "http://localhost:8080")]
    pub cors_origin: String,
}

impl Flags {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Everything a request handler needs. Built once at startup and shared between requests.
pub struct App {
    pub dataset: Dataset,
    /// Already validated
    pub cors_origin: String,
    pub templates: Environment<'static>,
}

impl App {
    pub fn new(dataset: Dataset, cors_origin: &str) -> Result<App> {
        Ok(App {
            dataset,
            cors_origin: parse_origin(cors_origin)?,
            templates: templates::environment()?,
        })
    }

    pub fn load(flags: &Flags) -> Result<App> {
        let mut timer = Timer::new("load fire risk data");
        let dataset = Dataset::load(&flags.data_dir, &mut timer)
            .with_context(|| format!("loading data from {}", flags.data_dir))?;
        timer.done();
        App::new(dataset, &flags.cors_origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let flags = Flags::from_iter(vec!["firemap"]);
        assert_eq!("data", flags.data_dir);
        assert_eq!("127.0.0.1:5000", flags.addr().to_string());
        assert_eq!("http://localhost:8080", flags.cors_origin);

        let flags = Flags::from_iter(vec![
            "firemap",
            "--data-dir",
            "/srv/firemap",
            "--port",
            "8000",
            "--bind",
            "0.0.0.0",
        ]);
        assert_eq!("/srv/firemap", flags.data_dir);
        assert_eq!("0.0.0.0:8000", flags.addr().to_string());
    }
}
