use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use dotenvy::dotenv;
use uuid::Uuid;

use hallpass::access::store::PgRoleStore;
use hallpass::cli::seeder::{assign_and_activate, seed_admin_role};
use hallpass::config::database::run_migrations;

#[derive(Parser)]
#[command(name = "hallpass-cli")]
#[command(about = "Hallpass CLI - Administrative tools for Hallpass", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed an administrator role with the full permission catalog
    Seed {
        /// Name for the administrator role
        #[arg(short = 'n', long, default_value = "admin")]
        name: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Assign a role to a user and make it their active role
    AssignRole {
        /// User ID
        #[arg(short = 'u', long)]
        user: Uuid,

        /// Role ID
        #[arg(short = 'r', long)]
        role: Uuid,
    },
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");
    run_migrations(&pool).await;

    let store = PgRoleStore::new(pool);
    let cli = Cli::parse();

    match cli.command {
        Commands::Seed { name, yes } => handle_seed(&store, &name, yes).await,
        Commands::AssignRole { user, role } => handle_assign_role(&store, user, role).await,
    }
}

async fn handle_seed(store: &PgRoleStore, name: &str, yes: bool) {
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Seed role '{}' with every permission in the catalog?",
                name
            ))
            .default(false)
            .interact()
            .expect("Failed to read confirmation");

        if !confirmed {
            println!("Aborted.");
            return;
        }
    }

    match seed_admin_role(store, name).await {
        Ok(seeded) => {
            println!("\n✅ Role '{}' seeded and activated!", seeded.role.name);
            println!("   ID: {}", seeded.role.id);
            println!("   Permissions: {}", seeded.permissions.len());
        }
        Err(e) => {
            eprintln!("\n❌ Error seeding role: {}", e.error);
            std::process::exit(1);
        }
    }
}

async fn handle_assign_role(store: &PgRoleStore, user: Uuid, role: Uuid) {
    match assign_and_activate(store, user, role).await {
        Ok(active) => {
            println!("\n✅ Role assigned and activated!");
            println!("   User: {}", user);
            println!("   Active role: {} ({})", active.role.name, active.role.id);
        }
        Err(e) => {
            eprintln!("\n❌ Error assigning role: {}", e.error);
            std::process::exit(1);
        }
    }
}
