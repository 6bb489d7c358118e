use super::query::QueryArgs;
use clap::Args;
use std::sync::Arc;
use students_provider::contract;
use students_query::QueryDescriptor;
use students_routes::Router;
use tracing::debug;

#[derive(Args)]
pub struct ResolveCommand {
    #[command(flatten)]
    pub query: QueryArgs,
}

impl ResolveCommand {
    fn resolve(&self) -> anyhow::Result<QueryDescriptor> {
        let address = self.query.address()?;
        let router = Router::new(Arc::new(contract::schema_registry(&self.query.authority)?));

        let matched = router.match_address(&address);
        debug!("{} classified as {}", address, matched.kind);

        Ok(router.resolve(&address, self.query.to_request())?)
    }

    pub fn execute(self) -> anyhow::Result<()> {
        let descriptor = self.resolve()?;
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
        Ok(())
    }
}
