// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Agreement commands, executed against a running server through `pact-sdk`.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use uuid::Uuid;

use pact_sdk::{Agreement, AgreementId, AgreementStatus, PactClient, PublicAgreement};

#[derive(Subcommand)]
pub enum AgreementCommand {
    /// Create a new draft agreement
    Create {
        /// Agreement title
        #[arg(long)]
        title: String,

        /// Optional longer description
        #[arg(short, long)]
        description: Option<String>,

        /// Your name (becomes the creator)
        #[arg(short, long, env = "PACT_NAME")]
        name: String,
    },

    /// Join an agreement with an invite code
    Join {
        #[arg(value_name = "INVITE_CODE")]
        invite_code: String,

        /// Your name
        #[arg(short, long, env = "PACT_NAME")]
        name: String,
    },

    /// Show the full agreement (participants only)
    Show {
        #[arg(value_name = "AGREEMENT_ID")]
        id: Uuid,

        /// Your name
        #[arg(short, long, env = "PACT_NAME")]
        name: String,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the public view of an agreement
    Public {
        #[arg(value_name = "AGREEMENT_ID")]
        id: Uuid,

        /// Print raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Change title and description (creator only)
    Update {
        #[arg(value_name = "AGREEMENT_ID")]
        id: Uuid,

        #[arg(long)]
        title: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Your name
        #[arg(short, long, env = "PACT_NAME")]
        name: String,
    },

    /// Post a chat message
    Chat {
        #[arg(value_name = "AGREEMENT_ID")]
        id: Uuid,

        #[arg(value_name = "MESSAGE")]
        message: String,

        /// Your name
        #[arg(short, long, env = "PACT_NAME")]
        name: String,
    },

    /// Add a checklist item
    Checklist {
        #[arg(value_name = "AGREEMENT_ID")]
        id: Uuid,

        #[arg(value_name = "TEXT")]
        text: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,

        /// Your name
        #[arg(short, long, env = "PACT_NAME")]
        name: String,
    },

    /// Record your agreement
    Agree {
        #[arg(value_name = "AGREEMENT_ID")]
        id: Uuid,

        /// Your name
        #[arg(short, long, env = "PACT_NAME")]
        name: String,
    },
}

pub async fn handle_command(command: AgreementCommand, client: &PactClient) -> Result<()> {
    match command {
        AgreementCommand::Create {
            title,
            description,
            name,
        } => {
            let created = client
                .create_agreement(&title, description.as_deref(), &name)
                .await
                .context("Failed to create agreement")?;
            println!("{}", format!("✓ {}", created.message).green());
            println!("  Invite code: {}", created.invite_code.as_str().bold());
            println!();
            print_agreement(&created.agreement);
        }
        AgreementCommand::Join { invite_code, name } => {
            let agreement = client
                .join_agreement(&invite_code, &name)
                .await
                .context("Failed to join agreement")?;
            println!("{}", format!("✓ Joined '{}'", agreement.title).green());
            println!();
            print_agreement(&agreement);
        }
        AgreementCommand::Show { id, name, json } => {
            let agreement = client
                .get_agreement(AgreementId(id), &name)
                .await
                .context("Failed to fetch agreement")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&agreement)?);
            } else {
                print_agreement(&agreement);
            }
        }
        AgreementCommand::Public { id, json } => {
            let agreement = client
                .get_public_agreement(AgreementId(id))
                .await
                .context("Failed to fetch agreement")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&agreement)?);
            } else {
                print_public(&agreement);
            }
        }
        AgreementCommand::Update {
            id,
            title,
            description,
            name,
        } => {
            let agreement = client
                .update_agreement(AgreementId(id), &title, description.as_deref(), &name)
                .await
                .context("Failed to update agreement")?;
            println!("{}", "✓ Agreement updated".green());
            println!();
            print_agreement(&agreement);
        }
        AgreementCommand::Chat { id, message, name } => {
            let sent = client
                .add_message(AgreementId(id), &name, &message)
                .await
                .context("Failed to post message")?;
            println!(
                "{}",
                format!("✓ Message posted at {}", sent.timestamp.format("%Y-%m-%d %H:%M:%S")).green()
            );
        }
        AgreementCommand::Checklist {
            id,
            text,
            deadline,
            name,
        } => {
            let item = client
                .add_checklist_item(AgreementId(id), &text, deadline.as_deref(), &name)
                .await
                .context("Failed to add checklist item")?;
            println!("{}", format!("✓ Checklist item added: {}", item.text).green());
        }
        AgreementCommand::Agree { id, name } => {
            let outcome = client
                .agree(AgreementId(id), &name)
                .await
                .context("Failed to record agreement")?;
            println!("{}", format!("✓ {}", outcome.message).green());
            if outcome.all_agreed {
                println!("{}", "All participants have agreed.".green().bold());
            } else {
                let waiting: Vec<_> = outcome
                    .agreement
                    .participants
                    .iter()
                    .filter(|p| !p.has_agreed)
                    .map(|p| p.name.as_str())
                    .collect();
                println!("  Waiting on: {}", waiting.join(", "));
            }
        }
    }

    Ok(())
}

fn status_label(status: AgreementStatus) -> colored::ColoredString {
    match status {
        AgreementStatus::Draft => "draft".dimmed(),
        AgreementStatus::Pending => "pending".yellow(),
        AgreementStatus::Agreed => "agreed".green(),
        AgreementStatus::Completed => "completed".cyan(),
        AgreementStatus::Cancelled => "cancelled".red(),
    }
}

fn agreed_mark(has_agreed: bool) -> colored::ColoredString {
    if has_agreed {
        "✓".green()
    } else {
        "·".dimmed()
    }
}

fn print_agreement(agreement: &Agreement) {
    println!("{} {}", agreement.title.bold(), format!("({})", agreement.id).dimmed());
    if !agreement.description.is_empty() {
        println!("  {}", agreement.description);
    }
    println!("  Status: {}", status_label(agreement.status));
    println!("  Invite code: {}", agreement.invite_code.as_str());

    println!("{}", "Participants:".bold());
    for participant in &agreement.participants {
        println!("  {} {}", agreed_mark(participant.has_agreed), participant.name);
    }

    if !agreement.checklist.is_empty() {
        println!("{}", "Checklist:".bold());
        for item in &agreement.checklist {
            let mark = if item.is_completed { "[x]" } else { "[ ]" };
            match item.deadline {
                Some(deadline) => println!("  {} {} (due {})", mark, item.text, deadline),
                None => println!("  {} {}", mark, item.text),
            }
        }
    }

    if !agreement.chat.is_empty() {
        println!("{}", "Chat:".bold());
        for message in &agreement.chat {
            println!(
                "  {} {}: {}",
                message.timestamp.format("%H:%M").to_string().dimmed(),
                message.sender_name.bold(),
                message.content
            );
        }
    }
}

fn print_public(agreement: &PublicAgreement) {
    println!("{} {}", agreement.title.bold(), format!("({})", agreement.id).dimmed());
    if !agreement.description.is_empty() {
        println!("  {}", agreement.description);
    }
    println!("  Status: {}", status_label(agreement.status));
    println!("{}", "Participants:".bold());
    for participant in &agreement.participants {
        println!("  {} {}", agreed_mark(participant.has_agreed), participant.name);
    }
}
