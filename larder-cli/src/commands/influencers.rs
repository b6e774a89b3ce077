//! `larder influencers` - influencer records
//!
//! Create and update take the record as JSON (camelCase keys):
//!   larder influencers create --data '{"name":"Ana","specialties":["soup"]}'
//!   echo '{"bio":"Soup person"}' | larder influencers update <id> --data -

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use larder_core::{Influencer, InfluencerPatch, LarderConfig, NewInfluencer};
use larder_db::InfluencerService;
use tracing::info;

use super::{connect, output_format, print_record, print_records, read_json, OutputFormat};

#[derive(Parser, Debug)]
pub struct InfluencerArgs {
    #[command(subcommand)]
    pub command: InfluencerCommand,

    /// Output format
    #[arg(long, short, value_enum, default_value = "human", global = true)]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum InfluencerCommand {
    /// List every influencer
    List,
    /// Show one influencer
    Get {
        /// Influencer id
        id: String,
    },
    /// Create an influencer from JSON
    Create {
        /// Record as JSON, or `-` to read stdin
        #[arg(long)]
        data: String,
    },
    /// Change some fields of an influencer
    Update {
        /// Influencer id
        id: String,
        /// Fields to change as JSON, or `-` to read stdin
        #[arg(long)]
        data: String,
    },
    /// Delete an influencer (and, through the database, their recipes)
    Delete {
        /// Influencer id
        id: String,
    },
    /// Case-insensitive substring search over name and bio
    Search {
        /// Text to look for
        query: String,
    },
}

fn summary(influencer: &Influencer) -> String {
    let mut line = format!(
        "{}  {}  ({} followers, {} recipes)",
        influencer.id, influencer.name, influencer.followers, influencer.recipes_count
    );
    if !influencer.specialties.is_empty() {
        line.push_str(&format!("  [{}]", influencer.specialties.join(", ")));
    }
    line
}

pub async fn run_influencers(args: InfluencerArgs, config: &LarderConfig) -> Result<()> {
    let format = output_format(args.output, args.json);
    let service = InfluencerService::new(connect(config).await?);

    match args.command {
        InfluencerCommand::List => {
            let all = service.get_all().await?;
            print_records(&all, format, |i| i.id.as_str(), summary)
        }
        InfluencerCommand::Get { id } => {
            let influencer = service.get_by_id(&id).await?;
            print_record(&influencer, &influencer.id, format)
        }
        InfluencerCommand::Create { data } => {
            let data: NewInfluencer = read_json(&data)?;
            if data.name.trim().is_empty() {
                bail!("An influencer needs a name");
            }
            let created = service.create(&data).await?;
            info!(id = %created.id, "Created influencer");
            print_record(&created, &created.id, format)
        }
        InfluencerCommand::Update { id, data } => {
            let patch: InfluencerPatch = read_json(&data)?;
            let updated = service.update(&id, &patch).await?;
            info!(id = %updated.id, "Updated influencer");
            print_record(&updated, &updated.id, format)
        }
        InfluencerCommand::Delete { id } => {
            service.delete(&id).await?;
            if format != OutputFormat::Quiet {
                println!("Deleted influencer {}", id);
            }
            Ok(())
        }
        InfluencerCommand::Search { query } => {
            let found = service.search(&query).await?;
            print_records(&found, format, |i| i.id.as_str(), summary)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::SocialMedia;

    #[test]
    fn summary_lists_specialties() {
        let influencer = Influencer {
            id: "i1".into(),
            name: "Ana".into(),
            avatar: String::new(),
            cover_image: String::new(),
            bio: String::new(),
            social_media: SocialMedia::default(),
            specialties: vec!["soup".into(), "bread".into()],
            followers: 12,
            recipes_count: 3,
        };
        assert_eq!(
            summary(&influencer),
            "i1  Ana  (12 followers, 3 recipes)  [soup, bread]"
        );
    }
}
