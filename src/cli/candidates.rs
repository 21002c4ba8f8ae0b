//! Candidates command handler.

use color_eyre::Result;

use crate::context::Context;

use super::App;

impl App {
    /// Print the candidates a run would process.
    pub async fn run_candidates(&self) -> Result<()> {
        let ctx = Context::new(self.load_config()?)?;
        let (fetched, candidates) = ctx.reconciler().sampled_candidates().await?;

        tracing::info!("Listing {} of {} candidates", candidates.len(), fetched);
        println!("{}", serde_json::to_string_pretty(&candidates)?);
        Ok(())
    }
}
