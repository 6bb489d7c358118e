use clap::Args;
use colored::Colorize;
use students_provider::contract;
use students_routes::ResourceKind;

#[derive(Args)]
pub struct RoutesCommand {
    /// Authority the students templates are registered under
    #[arg(long, env = "STUDENTS_AUTHORITY", default_value = contract::CONTENT_AUTHORITY)]
    pub authority: String,
}

impl RoutesCommand {
    pub fn execute(self) -> anyhow::Result<()> {
        let registry = contract::schema_registry(&self.authority)?;

        for (index, template) in registry.templates().iter().enumerate() {
            let kind = match template.kind() {
                ResourceKind::Collection => template.kind().to_string().green(),
                ResourceKind::SingleItem => template.kind().to_string().cyan(),
                ResourceKind::Unmatched => template.kind().to_string().red(),
            };

            println!(
                "{}. content://{}/{}  {}  table={} id={}",
                index + 1,
                template.authority(),
                template.pattern_string().bold(),
                kind,
                template.table_name(),
                template.identity_column()
            );
        }

        Ok(())
    }
}
