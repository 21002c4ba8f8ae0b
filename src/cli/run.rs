//! Run command handler.

use color_eyre::Result;

use crate::context::Context;

use super::App;

impl App {
    /// Run the full reconciliation and write the patch.
    pub async fn run_reconcile(&self) -> Result<()> {
        let config = self.load_config()?;
        tracing::info!(
            "Reconciling {} against {}",
            config.sparql.endpoint,
            config.registry.endpoint
        );

        let ctx = Context::new(config)?;
        let report = ctx.reconciler().run().await?;

        println!("{}", report);
        Ok(())
    }
}
