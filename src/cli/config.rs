//! Config command handler.

use color_eyre::Result;

use super::App;

impl App {
    /// Print the resolved configuration.
    pub fn run_config(&self) -> Result<()> {
        let config = self.load_config()?;
        println!("{}", serde_json::to_string_pretty(&config)?);
        Ok(())
    }
}
