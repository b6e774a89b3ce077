//! `larder recipes` - recipe records
//!
//! `create` and `edit` go through the recipe form: the given `--set` edits
//! are applied to a draft (blank, or loaded from the existing recipe), the
//! draft is validated, written, and read back before success is reported.
//! Ctrl-C while saving closes the form and the result is discarded.
//!
//!   larder recipes create --set title=Shakshuka --set influencerId=<id> \
//!       --set tags="eggs, brunch" --ingredient "eggs|4|" --step "Simmer sauce"
//!   larder recipes edit <id> --set servings=6

use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use clap::{Parser, Subcommand};
use larder_admin::{Notification, Notifier, RecipeForm, SubmitOutcome};
use larder_core::{Ingredient, LarderConfig, Recipe};
use larder_db::RecipeService;
use tracing::debug;

use super::{connect, output_format, print_record, print_records, OutputFormat};

#[derive(Parser, Debug)]
pub struct RecipeArgs {
    #[command(subcommand)]
    pub command: RecipeCommand,

    /// Output format
    #[arg(long, short, value_enum, default_value = "human", global = true)]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum RecipeCommand {
    /// List recipes
    List {
        /// Only recipes by this influencer
        #[arg(long, value_name = "ID")]
        influencer: Option<String>,
    },
    /// Show one recipe
    Get {
        /// Recipe id
        id: String,
    },
    /// Case-insensitive substring search over title and description
    Search {
        /// Text to look for
        query: String,
    },
    /// Delete a recipe
    Delete {
        /// Recipe id
        id: String,
    },
    /// Create a recipe through the form
    Create(FormEdits),
    /// Edit a recipe through the form
    Edit {
        /// Recipe id
        id: String,
        #[command(flatten)]
        edits: FormEdits,
    },
}

#[derive(Parser, Debug, Default)]
pub struct FormEdits {
    /// Set a form field as field=value (title, description, image, prepTime,
    /// cookTime, servings, calories, tags, influencerId)
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,

    /// Ingredient as "name|amount|unit"; replaces the ingredient list
    #[arg(long = "ingredient", value_name = "NAME|AMOUNT|UNIT", value_parser = parse_ingredient)]
    pub ingredients: Vec<Ingredient>,

    /// Instruction step, in order; replaces the instruction list
    #[arg(long = "step", value_name = "TEXT")]
    pub steps: Vec<String>,
}

fn parse_assignment(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_owned(), value.to_owned()))
        }
        _ => Err(format!("expected FIELD=VALUE, got '{}'", arg)),
    }
}

fn parse_ingredient(arg: &str) -> Result<Ingredient, String> {
    let mut parts = arg.splitn(3, '|').map(str::trim);
    let name = parts.next().unwrap_or_default();
    if name.is_empty() {
        return Err(format!("ingredient needs a name, got '{}'", arg));
    }
    Ok(Ingredient::new(
        name,
        parts.next().unwrap_or_default(),
        parts.next().unwrap_or_default(),
    ))
}

/// Prints form notifications to the terminal.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        if notification.is_destructive() {
            eprintln!("❌ {}: {}", notification.title, notification.description);
        } else {
            eprintln!("✅ {} {}", notification.title, notification.description);
        }
    }
}

fn summary(recipe: &Recipe) -> String {
    format!(
        "{}  {}  ({}+{} min, serves {}, {} kcal)",
        recipe.id, recipe.title, recipe.prep_time, recipe.cook_time, recipe.servings, recipe.calories
    )
}

pub async fn run_recipes(args: RecipeArgs, config: &LarderConfig) -> Result<()> {
    let format = output_format(args.output, args.json);
    let service = RecipeService::new(connect(config).await?);

    match args.command {
        RecipeCommand::List { influencer } => {
            let recipes = match influencer {
                Some(id) => service.by_influencer(&id).await?,
                None => service.get_all().await?,
            };
            print_records(&recipes, format, |r| r.id.as_str(), summary)
        }
        RecipeCommand::Get { id } => {
            let recipe = service.get_by_id(&id).await?;
            print_record(&recipe, &recipe.id, format)
        }
        RecipeCommand::Search { query } => {
            let found = service.search(&query).await?;
            print_records(&found, format, |r| r.id.as_str(), summary)
        }
        RecipeCommand::Delete { id } => {
            service.delete(&id).await?;
            if format != OutputFormat::Quiet {
                println!("Deleted recipe {}", id);
            }
            Ok(())
        }
        RecipeCommand::Create(edits) => {
            let saved = submit_form(service, None, edits).await?;
            print_record(&saved, &saved.id, format)
        }
        RecipeCommand::Edit { id, edits } => {
            let existing = service.get_by_id(&id).await?;
            let saved = submit_form(service, Some(existing), edits).await?;
            print_record(&saved, &saved.id, format)
        }
    }
}

async fn submit_form(
    service: RecipeService,
    editing: Option<Recipe>,
    edits: FormEdits,
) -> Result<Recipe> {
    let mut form = RecipeForm::new(service, Arc::new(ConsoleNotifier));
    form.open(editing);
    debug!(title = form.title(), "Recipe form open");

    for (field, value) in edits.set {
        form.set_field(&field, value)?;
    }
    if !edits.ingredients.is_empty() {
        form.set_ingredients(edits.ingredients)?;
    }
    if !edits.steps.is_empty() {
        form.set_instructions(edits.steps)?;
    }

    let handle = form.handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            handle.close();
        }
    });
    let outcome = form.submit().await;
    interrupt.abort();

    match outcome {
        SubmitOutcome::Saved(recipe) => Ok(recipe),
        SubmitOutcome::Rejected(errors) => bail!("Recipe not saved: {}", errors),
        SubmitOutcome::Failed(message) => Err(anyhow!(message)),
        SubmitOutcome::Discarded => bail!("Interrupted while saving; the result was discarded"),
        SubmitOutcome::Ignored => bail!("The recipe form was not open"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_split_on_first_equals() {
        assert_eq!(
            parse_assignment("title=a=b").unwrap(),
            ("title".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_assignment("tags=").unwrap(),
            ("tags".to_string(), String::new())
        );
        assert!(parse_assignment("title").is_err());
        assert!(parse_assignment("=x").is_err());
    }

    #[test]
    fn ingredients_allow_missing_amount_and_unit() {
        assert_eq!(
            parse_ingredient("flour | 200 | g").unwrap(),
            Ingredient::new("flour", "200", "g")
        );
        assert_eq!(parse_ingredient("salt").unwrap(), Ingredient::new("salt", "", ""));
        assert!(parse_ingredient("|1|cup").is_err());
    }
}
