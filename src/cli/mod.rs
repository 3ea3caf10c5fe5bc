//! Command-line front end.
//!
//! Every command that shows a view enters its route through the guard first, so the
//! CLI obeys the same rules as the console views:
//! - `login` / `logout` / `whoami` - manage the persisted session
//! - `dashboard` - inventory summary
//! - `equipment`, `employees`, `locations` - list and edit records
//! - `ask` - question the inventory assistant
//! - `config check` - validate the configuration file

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use crate::api::{EquipmentFilter, PageFilter};
use crate::config::Config;
use crate::console::validation::{
    validate_credentials, validate_email, validate_employee_draft, validate_equipment_draft,
    validate_required, validate_spreadsheet_path,
};
use crate::console::{ChatSession, DashboardSummary, ListView, Section};
use crate::models::{
    Employee, EmployeeDraft, EmployeePatch, Equipment, EquipmentCondition, EquipmentDraft,
    EquipmentPatch, EquipmentStatus, EquipmentType, Location, LocationDraft, LocationPatch,
};
use crate::router::{DenyReason, Route, ViewScope};
use crate::Console;

#[derive(Parser, Debug)]
#[command(name = "assetdesk")]
#[command(author, version, about = "Console for the IT asset inventory", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "assetdesk.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Inventory API base URL, including the version prefix
    #[arg(long, env = "ASSETDESK_API_URL")]
    pub api_url: Option<String>,

    /// Directory holding the persisted session
    #[arg(long, env = "ASSETDESK_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Apply command-line and environment overrides on top of the file config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(api_url) = &self.api_url {
            config.api.base_url = api_url.clone();
        }
        if let Some(state_dir) = &self.state_dir {
            config.session.state_dir = state_dir.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and persist the session
    Login {
        #[arg(long, value_parser = trimmed)]
        email: String,
        /// Password (prompted on stdin when omitted)
        #[arg(long, env = "ASSETDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Sign out and clear the persisted session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Inventory summary
    Dashboard,

    /// Equipment management commands
    #[command(subcommand)]
    Equipment(EquipmentCommands),

    /// Employee management commands
    #[command(subcommand)]
    Employees(EmployeeCommands),

    /// Location management commands
    #[command(subcommand)]
    Locations(LocationCommands),

    /// Ask the inventory assistant a question
    Ask {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum EquipmentCommands {
    /// List equipment
    List {
        #[arg(long = "type", value_name = "TYPE")]
        equipment_type: Option<EquipmentType>,
        #[arg(long)]
        status: Option<EquipmentStatus>,
        #[arg(long)]
        skip: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one piece of equipment
    Show { id: i64 },
    /// Register new equipment
    Create {
        #[arg(long)]
        serial: String,
        #[arg(long)]
        model: String,
        #[arg(long = "type", value_name = "TYPE")]
        equipment_type: EquipmentType,
        #[arg(long, default_value = "new")]
        condition: EquipmentCondition,
        #[arg(long, default_value = "in_stock")]
        status: EquipmentStatus,
        #[arg(long)]
        location: Option<i64>,
        #[arg(long)]
        employee: Option<i64>,
    },
    /// Update fields of existing equipment
    Update {
        id: i64,
        #[arg(long)]
        serial: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long = "type", value_name = "TYPE")]
        equipment_type: Option<EquipmentType>,
        #[arg(long)]
        condition: Option<EquipmentCondition>,
        #[arg(long)]
        status: Option<EquipmentStatus>,
        #[arg(long)]
        location: Option<i64>,
        #[arg(long)]
        employee: Option<i64>,
    },
    /// Delete equipment
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Assign equipment to an employee
    Assign {
        equipment: i64,
        employee: i64,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Import equipment from an Excel file (.xlsx, .xls)
    Import { file: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum EmployeeCommands {
    /// List employees
    List {
        #[arg(long)]
        skip: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one employee
    Show { id: i64 },
    /// Add an employee
    Create {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, value_parser = trimmed)]
        email: String,
        #[arg(long)]
        department: String,
    },
    /// Update fields of an employee
    Update {
        id: i64,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long, value_parser = trimmed)]
        email: Option<String>,
        #[arg(long)]
        department: Option<String>,
    },
    /// Delete an employee
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum LocationCommands {
    /// List locations
    List {
        #[arg(long)]
        skip: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one location
    Show { id: i64 },
    /// Add a location
    Create {
        #[arg(long)]
        site: String,
        #[arg(long)]
        floor: String,
        #[arg(long)]
        room: String,
        #[arg(long)]
        position: Option<String>,
    },
    /// Update fields of a location
    Update {
        id: i64,
        #[arg(long)]
        site: Option<String>,
        #[arg(long)]
        floor: Option<String>,
        #[arg(long)]
        room: Option<String>,
        #[arg(long)]
        position: Option<String>,
    },
    /// Delete a location
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

/// Surrounding whitespace is dropped before any check sees the value.
fn trimmed(value: &str) -> Result<String, String> {
    Ok(value.trim().to_string())
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration file
    Check,
}

impl Commands {
    /// View a command is shown in, when it needs one.
    pub fn route(&self) -> Option<Route> {
        match self {
            Commands::Login { .. } => Some(Route::Login),
            Commands::Dashboard => Some(Route::Dashboard),
            Commands::Equipment(EquipmentCommands::Create { .. }) => Some(Route::EquipmentNew),
            Commands::Equipment(EquipmentCommands::Update { id, .. }) => {
                Some(Route::EquipmentEdit(*id))
            }
            Commands::Equipment(_) => Some(Route::Equipment),
            Commands::Employees(EmployeeCommands::Create { .. }) => Some(Route::EmployeeNew),
            Commands::Employees(EmployeeCommands::Update { id, .. }) => {
                Some(Route::EmployeeEdit(*id))
            }
            Commands::Employees(_) => Some(Route::Employees),
            Commands::Locations(_) => Some(Route::Locations),
            Commands::Ask { .. } => Some(Route::Chatbot),
            Commands::Logout | Commands::Whoami | Commands::Config(_) => None,
        }
    }
}

pub async fn run_command(cli: &Cli, config: Config) -> Result<()> {
    if let Commands::Config(ConfigCommands::Check) = &cli.command {
        return cmd_config_check(cli, &config);
    }

    let console = Console::open(config).context("Failed to open console")?;
    let scope = match cli.command.route() {
        Some(route) => Some(enter(&console, route).await?),
        None => None,
    };
    let scope = scope.unwrap_or_else(ViewScope::detached);

    match &cli.command {
        Commands::Login { email, password } => cmd_login(&console, email, password.as_deref()).await,
        Commands::Logout => cmd_logout(&console),
        Commands::Whoami => cmd_whoami(&console).await,
        Commands::Dashboard => cmd_dashboard(&console, &scope).await,
        Commands::Equipment(command) => cmd_equipment(&console, scope, command).await,
        Commands::Employees(command) => cmd_employees(&console, scope, command).await,
        Commands::Locations(command) => cmd_locations(&console, scope, command).await,
        Commands::Ask { question } => cmd_ask(&console, scope, &question.join(" ")).await,
        Commands::Config(ConfigCommands::Check) => Ok(()),
    }
}

/// Enter `route` through the guard. Role-gated routes load a missing profile first.
async fn enter(console: &Console, route: Route) -> Result<ViewScope> {
    if route.required_roles().is_some() {
        console
            .clients()
            .auth
            .ensure_profile()
            .await
            .context("Failed to load your profile")?;
    }

    console.router().navigate(route).map_err(|reason| match reason {
        DenyReason::Unauthenticated => {
            anyhow!("Not signed in. Run `assetdesk login --email <email>` first.")
        }
        DenyReason::Forbidden => {
            anyhow!("Your role does not allow this operation (admin or manager required).")
        }
    })
}

async fn cmd_login(console: &Console, email: &str, password: Option<&str>) -> Result<()> {
    let password = match password {
        Some(password) => password.to_string(),
        None => prompt("Password: ")?,
    };
    validate_credentials(email, &password)?;

    let auth = &console.clients().auth;
    auth.login(email, &password).await?;

    match console.session().profile() {
        Some(profile) => println!(
            "Signed in as {} <{}> ({})",
            profile.display_name(),
            profile.email,
            profile.role
        ),
        None => println!("Signed in as {}", email),
    }
    Ok(())
}

fn cmd_logout(console: &Console) -> Result<()> {
    if console.clients().auth.logout() {
        println!("Signed out.");
    } else {
        println!("Not signed in.");
    }
    Ok(())
}

async fn cmd_whoami(console: &Console) -> Result<()> {
    if !console.session().is_authenticated() {
        println!("Not signed in.");
        return Ok(());
    }

    match console.clients().auth.ensure_profile().await? {
        Some(profile) => {
            println!();
            println!("Name:   {}", profile.display_name());
            println!("Email:  {}", profile.email);
            println!("Role:   {}", profile.role);
            println!("Active: {}", if profile.is_active { "yes" } else { "no" });
            println!();
        }
        None => println!("Not signed in."),
    }
    Ok(())
}

async fn cmd_dashboard(console: &Console, scope: &ViewScope) -> Result<()> {
    let summary = DashboardSummary::load(console.clients(), scope).await?;

    println!();
    println!("=== Inventory ===");
    println!();
    match &summary.equipment {
        Ok(equipment) => {
            println!("Equipment:  {}", equipment.total);
            println!("  In stock: {}", equipment.in_stock);
            println!("  Assigned: {}", equipment.assigned);
        }
        Err(message) => println!("Equipment:  unavailable ({})", message),
    }
    print_count("Employees:", &summary.employee_count);
    print_count("Locations:", &summary.location_count);

    if let Ok(equipment) = &summary.equipment {
        if !equipment.by_type.is_empty() {
            println!();
            println!("By type:");
            for (equipment_type, count) in &equipment.by_type {
                println!("  {:<12} {}", equipment_type.label(), count);
            }
        }

        if !equipment.recent.is_empty() {
            println!();
            println!("Recent equipment:");
            print_equipment_table(&equipment.recent);
        }
    }
    println!();

    if !summary.is_complete() {
        anyhow::bail!("Some dashboard sections failed to load");
    }
    Ok(())
}

fn print_count(label: &str, count: &Section<usize>) {
    match count {
        Ok(count) => println!("{:<11} {}", label, count),
        Err(message) => println!("{:<11} unavailable ({})", label, message),
    }
}

async fn cmd_equipment(
    console: &Console,
    scope: ViewScope,
    command: &EquipmentCommands,
) -> Result<()> {
    let client = console.clients().equipment.clone();

    match command {
        EquipmentCommands::List {
            equipment_type,
            status,
            skip,
            limit,
        } => {
            let filter = EquipmentFilter {
                skip: *skip,
                limit: *limit,
                equipment_type: *equipment_type,
                status: *status,
            };
            let mut view = ListView::new(client, scope);
            view.load(&filter).await?;
            if view.records().is_empty() {
                println!("No equipment found.");
            } else {
                print_equipment_table(view.records());
            }
        }
        EquipmentCommands::Show { id } => {
            let equipment = scope.run(client.get(*id)).await?;
            print_equipment(&equipment);
        }
        EquipmentCommands::Create {
            serial,
            model,
            equipment_type,
            condition,
            status,
            location,
            employee,
        } => {
            let draft = EquipmentDraft {
                serial_number: serial.clone(),
                model: model.clone(),
                equipment_type: *equipment_type,
                condition: *condition,
                status: *status,
                location_id: *location,
                employee_id: *employee,
            };
            validate_equipment_draft(&draft)?;
            let created = scope.run(client.create(&draft)).await?;
            println!("Created equipment {} ({})", created.id, created.serial_number);
        }
        EquipmentCommands::Update {
            id,
            serial,
            model,
            equipment_type,
            condition,
            status,
            location,
            employee,
        } => {
            let patch = EquipmentPatch {
                serial_number: serial.clone(),
                model: model.clone(),
                equipment_type: *equipment_type,
                condition: *condition,
                status: *status,
                location_id: *location,
                employee_id: *employee,
            };
            if patch.is_empty() {
                anyhow::bail!("Nothing to update: pass at least one field");
            }
            if let Some(serial) = &patch.serial_number {
                validate_required(serial, "Serial number").map_err(|e| anyhow!(e))?;
            }
            let updated = scope.run(client.update(*id, &patch)).await?;
            println!("Updated equipment {}", updated.id);
        }
        EquipmentCommands::Delete { id, yes } => {
            let mut view = ListView::new(client, scope);
            let prompt_text = format!("Delete equipment {}?", id);
            let deleted = view
                .remove(*id, |_| *yes || confirm(&prompt_text))
                .await?;
            if deleted {
                println!("Deleted equipment {}", id);
            } else {
                println!("Cancelled.");
            }
        }
        EquipmentCommands::Assign {
            equipment,
            employee,
            notes,
        } => {
            let assigned = scope
                .run(client.assign(*equipment, *employee, notes.clone()))
                .await?;
            println!(
                "Assigned equipment {} ({}) to employee {}",
                assigned.id, assigned.serial_number, employee
            );
        }
        EquipmentCommands::Import { file } => {
            validate_spreadsheet_path(file).map_err(|e| anyhow!(e))?;
            let outcome = scope.run(client.import(file)).await?;
            println!("{}", outcome.detail);
        }
    }
    Ok(())
}

async fn cmd_employees(
    console: &Console,
    scope: ViewScope,
    command: &EmployeeCommands,
) -> Result<()> {
    let client = console.clients().employees.clone();

    match command {
        EmployeeCommands::List { skip, limit } => {
            let mut view = ListView::new(client, scope);
            view.load(&PageFilter {
                skip: *skip,
                limit: *limit,
            })
            .await?;
            if view.records().is_empty() {
                println!("No employees found.");
            } else {
                print_employee_table(view.records());
            }
        }
        EmployeeCommands::Show { id } => {
            let employee = scope.run(client.get(*id)).await?;
            println!();
            println!("=== Employee: {} ===", employee.full_name());
            println!();
            println!("ID:         {}", employee.id);
            println!("Email:      {}", employee.email);
            println!("Department: {}", employee.department);
            println!();
        }
        EmployeeCommands::Create {
            first_name,
            last_name,
            email,
            department,
        } => {
            let draft = EmployeeDraft {
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                email: email.clone(),
                department: department.clone(),
            };
            validate_employee_draft(&draft)?;
            let created = scope.run(client.create(&draft)).await?;
            println!("Created employee {} ({})", created.id, created.full_name());
        }
        EmployeeCommands::Update {
            id,
            first_name,
            last_name,
            email,
            department,
        } => {
            let patch = EmployeePatch {
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                email: email.clone(),
                department: department.clone(),
            };
            if patch.is_empty() {
                anyhow::bail!("Nothing to update: pass at least one field");
            }
            if let Some(email) = &patch.email {
                validate_email(email).map_err(|e| anyhow!(e))?;
            }
            let updated = scope.run(client.update(*id, &patch)).await?;
            println!("Updated employee {}", updated.id);
        }
        EmployeeCommands::Delete { id, yes } => {
            let mut view = ListView::new(client, scope);
            let prompt_text = format!("Delete employee {}?", id);
            let deleted = view
                .remove(*id, |_| *yes || confirm(&prompt_text))
                .await?;
            if deleted {
                println!("Deleted employee {}", id);
            } else {
                println!("Cancelled.");
            }
        }
    }
    Ok(())
}

async fn cmd_locations(
    console: &Console,
    scope: ViewScope,
    command: &LocationCommands,
) -> Result<()> {
    let client = console.clients().locations.clone();
    let mut view = ListView::new(client.clone(), scope.clone());

    match command {
        LocationCommands::List { skip, limit } => {
            view.load(&PageFilter {
                skip: *skip,
                limit: *limit,
            })
            .await?;
            if view.records().is_empty() {
                println!("No locations found.");
            } else {
                print_location_table(view.records());
            }
        }
        LocationCommands::Show { id } => {
            let location = scope.run(client.get(*id)).await?;
            println!();
            println!("=== Location: {} ===", location.label());
            println!();
            println!("ID:       {}", location.id);
            println!("Site:     {}", location.site);
            println!("Floor:    {}", location.floor);
            println!("Room:     {}", location.room);
            println!(
                "Position: {}",
                location.exact_position.as_deref().unwrap_or("-")
            );
            println!();
        }
        LocationCommands::Create {
            site,
            floor,
            room,
            position,
        } => {
            let draft = LocationDraft {
                site: site.clone(),
                floor: floor.clone(),
                room: room.clone(),
                exact_position: position.clone(),
            };
            let created = view.create(&draft, &PageFilter::default()).await?;
            println!("Created location {} ({})", created.id, created.label());
        }
        LocationCommands::Update {
            id,
            site,
            floor,
            room,
            position,
        } => {
            let patch = LocationPatch {
                site: site.clone(),
                floor: floor.clone(),
                room: room.clone(),
                exact_position: position.clone(),
            };
            if patch.is_empty() {
                anyhow::bail!("Nothing to update: pass at least one field");
            }
            let updated = scope.run(client.update(*id, &patch)).await?;
            println!("Updated location {} ({})", updated.id, updated.label());
        }
        LocationCommands::Delete { id, yes } => {
            let prompt_text = format!("Delete location {}?", id);
            let deleted = view
                .remove(*id, |_| *yes || confirm(&prompt_text))
                .await?;
            if deleted {
                println!("Deleted location {}", id);
            } else {
                println!("Cancelled.");
            }
        }
    }
    Ok(())
}

async fn cmd_ask(console: &Console, scope: ViewScope, question: &str) -> Result<()> {
    let mut chat = ChatSession::new(console.clients().chatbot.clone(), scope);
    match chat.ask(question, None).await? {
        Some(reply) => println!("{}", reply.text),
        None => anyhow::bail!("Question is empty"),
    }
    Ok(())
}

fn cmd_config_check(cli: &Cli, config: &Config) -> Result<()> {
    let config_path = &cli.config;

    println!("Checking configuration file: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!(
            "[!!] Configuration file not found: {}",
            config_path.display()
        );
        println!("Defaults and command-line overrides will be used.");
        println!();
    }

    match config.validate() {
        Ok(()) => {
            println!("[OK] Configuration is valid!");
            println!();
            println!("=== Configuration Summary ===");
            println!();
            println!("API:");
            println!("  Base URL:   {}", config.api.base_url);
            println!(
                "  Timeout:    {}",
                config
                    .api
                    .timeout_secs
                    .map(|s| format!("{}s", s))
                    .unwrap_or_else(|| "transport default".to_string())
            );
            println!();
            println!("Session:");
            println!("  State Dir:  {}", config.session.state_dir.display());
            println!();
            println!("Logging:");
            println!("  Level:      {}", config.logging.level);
            println!();
            Ok(())
        }
        Err(e) => {
            println!("[!!] Configuration is invalid!");
            println!();
            println!("Error: {:#}", e);
            println!();
            anyhow::bail!("Invalid configuration");
        }
    }
}

fn print_equipment_table(items: &[Equipment]) {
    println!();
    println!(
        "{:<6}  {:<16}  {:<24}  {:<10}  {:<14}  {:<9}  {:<8}",
        "ID", "SERIAL", "MODEL", "TYPE", "CONDITION", "STATUS", "EMPLOYEE"
    );
    println!("{}", "-".repeat(101));

    for item in items {
        println!(
            "{:<6}  {:<16}  {:<24}  {:<10}  {:<14}  {:<9}  {:<8}",
            item.id,
            truncate(&item.serial_number, 16),
            truncate(&item.model, 24),
            item.equipment_type.to_string(),
            item.condition.to_string(),
            item.status.to_string(),
            optional_id(item.employee_id)
        );
    }
    println!();
}

fn print_equipment(item: &Equipment) {
    println!();
    println!("=== Equipment: {} ===", item.serial_number);
    println!();
    println!("ID:        {}", item.id);
    println!("Model:     {}", item.model);
    println!("Type:      {}", item.equipment_type);
    println!("Condition: {}", item.condition);
    println!("Status:    {}", item.status);
    println!("Location:  {}", optional_id(item.location_id));
    println!("Employee:  {}", optional_id(item.employee_id));
    if let Some(created) = &item.created_at {
        println!("Created:   {}", created);
    }
    if let Some(updated) = &item.updated_at {
        println!("Updated:   {}", updated);
    }
    println!();
}

fn print_employee_table(items: &[Employee]) {
    println!();
    println!(
        "{:<6}  {:<28}  {:<32}  {:<20}",
        "ID", "NAME", "EMAIL", "DEPARTMENT"
    );
    println!("{}", "-".repeat(92));

    for item in items {
        println!(
            "{:<6}  {:<28}  {:<32}  {:<20}",
            item.id,
            truncate(&item.full_name(), 28),
            truncate(&item.email, 32),
            truncate(&item.department, 20)
        );
    }
    println!();
}

fn print_location_table(items: &[Location]) {
    println!();
    println!(
        "{:<6}  {:<20}  {:<8}  {:<12}  {:<30}",
        "ID", "SITE", "FLOOR", "ROOM", "POSITION"
    );
    println!("{}", "-".repeat(84));

    for item in items {
        println!(
            "{:<6}  {:<20}  {:<8}  {:<12}  {:<30}",
            item.id,
            truncate(&item.site, 20),
            truncate(&item.floor, 8),
            truncate(&item.room, 12),
            truncate(item.exact_position.as_deref().unwrap_or("-"), 30)
        );
    }
    println!();
}

fn optional_id(id: Option<i64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Ask a yes/no question on stdin; anything but `y`/`yes` declines.
fn confirm(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn prompt(label: &str) -> Result<String> {
    eprint!("{}", label);
    io::stderr().flush().ok();
    let mut value = String::new();
    io::stdin()
        .lock()
        .read_line(&mut value)
        .context("Failed to read from stdin")?;
    Ok(value.trim_end_matches(['\r', '\n']).to_string())
}

/// Truncate a string to max length with ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Latitude", 16), "Latitude");
        assert_eq!(truncate("ThinkPad X1 Carbon Gen 11", 12), "ThinkPad ...");
        // multi-byte characters are never split
        assert_eq!(truncate("Écran très très large", 8), "Écran...");
    }

    #[test]
    fn test_parse_equipment_list_filters() {
        let cli = Cli::try_parse_from([
            "assetdesk",
            "equipment",
            "list",
            "--type",
            "laptop",
            "--status",
            "in_stock",
            "--limit",
            "20",
        ])
        .unwrap();

        match cli.command {
            Commands::Equipment(EquipmentCommands::List {
                equipment_type,
                status,
                skip,
                limit,
            }) => {
                assert_eq!(equipment_type, Some(EquipmentType::Laptop));
                assert_eq!(status, Some(EquipmentStatus::InStock));
                assert_eq!(skip, None);
                assert_eq!(limit, Some(20));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        assert!(Cli::try_parse_from(["assetdesk", "equipment", "list", "--type", "toaster"]).is_err());
    }

    #[test]
    fn test_create_defaults() {
        let cli = Cli::try_parse_from([
            "assetdesk",
            "equipment",
            "create",
            "--serial",
            "SN-1",
            "--model",
            "Dell U2723QE",
            "--type",
            "monitor",
        ])
        .unwrap();

        match cli.command {
            Commands::Equipment(EquipmentCommands::Create {
                condition, status, ..
            }) => {
                assert_eq!(condition, EquipmentCondition::New);
                assert_eq!(status, EquipmentStatus::InStock);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_command_routes() {
        let route = |args: &[&str]| {
            let mut argv = vec!["assetdesk"];
            argv.extend_from_slice(args);
            Cli::try_parse_from(argv).unwrap().command.route()
        };

        assert_eq!(route(&["dashboard"]), Some(Route::Dashboard));
        assert_eq!(route(&["equipment", "show", "4"]), Some(Route::Equipment));
        assert_eq!(
            route(&["equipment", "update", "4", "--model", "X"]),
            Some(Route::EquipmentEdit(4))
        );
        assert_eq!(
            route(&[
                "employees", "create", "--first-name", "A", "--last-name", "B", "--email",
                "a@b.fr", "--department", "IT"
            ]),
            Some(Route::EmployeeNew)
        );
        assert_eq!(route(&["locations", "delete", "2", "--yes"]), Some(Route::Locations));
        assert_eq!(route(&["ask", "how", "many", "laptops"]), Some(Route::Chatbot));
        assert_eq!(route(&["whoami"]), None);
    }

    #[test]
    fn test_email_arguments_are_trimmed() {
        let cli = Cli::try_parse_from(["assetdesk", "login", "--email", " admin@localhost "])
            .unwrap();
        match cli.command {
            Commands::Login { email, .. } => {
                assert_eq!(email, "admin@localhost");
                assert!(validate_credentials(&email, "secret").is_ok());
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from([
            "assetdesk", "employees", "update", "3", "--email", "  lina@corp.fr",
        ])
        .unwrap();
        match cli.command {
            Commands::Employees(EmployeeCommands::Update { email, .. }) => {
                assert_eq!(email.as_deref(), Some("lina@corp.fr"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "assetdesk",
            "--api-url",
            "https://inventory.example.com/api/v1",
            "--state-dir",
            "/tmp/assetdesk",
            "--log-level",
            "debug",
            "logout",
        ])
        .unwrap();

        let mut config = Config::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.api.base_url, "https://inventory.example.com/api/v1");
        assert_eq!(config.session.state_dir, PathBuf::from("/tmp/assetdesk"));
        assert_eq!(config.logging.level, "debug");
    }

    #[tokio::test]
    async fn test_guarded_command_requires_login() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.session.state_dir = dir.path().to_path_buf();
        let console = Console::open(config).unwrap();

        let err = enter(&console, Route::Equipment).await.unwrap_err();
        assert!(err.to_string().contains("Not signed in"));
        assert_eq!(console.router().navigator().current(), Route::Login);
    }
}
