//! SIGTRAIL — Audit-chain demo CLI
//!
//! Walks a signature request through its life (create, open, sign) against
//! real SIGTRAIL components, then replays the chain with the integrity
//! verifier — once untouched, once after tampering with a stored entry.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- happy-path
//!   cargo run -p demo -- tamper-detection

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sigtrail_audit::{InMemoryAuditLog, InMemoryDirectory};
use sigtrail_contracts::{
    AccessToken, AuditAction, AuditEvent, Geolocation, RequestItemId, RequestState,
    SignRequestId, SignerValue, TrailResult,
};
use sigtrail_core::{AuditTrail, RequestDirectory};
use sigtrail_verify::{verify_chain, IntegrityVerifier};

// ── CLI definition ────────────────────────────────────────────────────────────

/// SIGTRAIL — tamper-evident audit trail for signature requests.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "SIGTRAIL audit-chain demo",
    long_about = "Runs SIGTRAIL demo scenarios showing hash-chained audit logging,\n\
                  integrity verification, and tamper detection."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run both scenarios in sequence.
    RunAll,
    /// Scenario 1: create/open/sign a request and verify the chain.
    HappyPath,
    /// Scenario 2: tamper with a stored entry and watch verification fail.
    TamperDetection,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging. Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::HappyPath => run_happy_path(),
        Command::TamperDetection => run_tamper_detection(),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_all() -> TrailResult<()> {
    run_happy_path()?;
    run_tamper_detection()?;
    Ok(())
}

// ── Scenario setup ────────────────────────────────────────────────────────────

/// Build a directory and log holding one request with document `b"PDF-V1"`,
/// a full create → open → sign → sign history, and one captured value per
/// signer.
fn build_trail() -> TrailResult<(Arc<InMemoryDirectory>, Arc<InMemoryAuditLog>, SignRequestId)> {
    let directory = Arc::new(InMemoryDirectory::new());
    let request = SignRequestId::new();
    directory.register_document(&request, b"PDF-V1".to_vec())?;

    let alice = AccessToken::new("T-Alice");
    let bob = AccessToken::new("T-Bob");
    directory.add_signer_value(&request, &alice, SignerValue::new("name", "Alice"));
    directory.add_signer_value(&request, &bob, SignerValue::new("name", "Bob"));

    let log = Arc::new(InMemoryAuditLog::new(directory.clone()));

    log.append(AuditEvent {
        sign_request_id: request.clone(),
        sign_request_item_id: None,
        action: AuditAction::Create,
        actor: Some("partner-7".to_string()),
        geolocation: None,
        ip: Some("198.51.100.1".to_string()),
        request_state: RequestState::Sent,
        token: None,
    })?;

    log.append(AuditEvent {
        sign_request_id: request.clone(),
        sign_request_item_id: Some(RequestItemId::new()),
        action: AuditAction::Open,
        actor: None,
        geolocation: None,
        ip: Some("203.0.113.9".to_string()),
        request_state: RequestState::Sent,
        token: Some(alice.clone()),
    })?;

    for (token, ip) in [(alice, "203.0.113.9"), (bob, "203.0.113.23")] {
        log.append(AuditEvent {
            sign_request_id: request.clone(),
            sign_request_item_id: Some(RequestItemId::new()),
            action: AuditAction::Sign,
            actor: None,
            geolocation: Some(Geolocation {
                latitude: 48.8566,
                longitude: 2.3522,
            }),
            ip: Some(ip.to_string()),
            request_state: RequestState::Sent,
            token: Some(token),
        })?;
    }

    Ok((directory, log, request))
}

fn print_entries(log: &InMemoryAuditLog, request: &SignRequestId) {
    for entry in log.entries(request) {
        println!(
            "  #{} {:<6} hash: {}",
            entry.sequence,
            entry.action.as_str(),
            entry.log_hash.as_deref().unwrap_or("—")
        );
    }
}

// ── Scenario 1: happy path ────────────────────────────────────────────────────

fn run_happy_path() -> TrailResult<()> {
    println!("Scenario 1 — happy path");
    println!("-----------------------");

    let (directory, log, request) = build_trail()?;
    println!("Appended trail for request {}:", request);
    print_entries(&log, &request);

    let verifier = IntegrityVerifier::new(log.clone(), directory.clone());
    let report = verifier.check_integrity(&request)?;

    println!(
        "Verification: {} ({} chained entries recomputed)",
        if report.is_valid() { "VALID" } else { "DIVERGED" },
        report.checked
    );
    println!();
    Ok(())
}

// ── Scenario 2: tamper detection ──────────────────────────────────────────────

fn run_tamper_detection() -> TrailResult<()> {
    println!("Scenario 2 — tamper detection");
    println!("-----------------------------");

    let (directory, log, request) = build_trail()?;

    // Simulate an attacker editing the stored ip of the first sign entry.
    let mut snapshot = log.chained_entries(&request);
    println!("Tampering: rewriting ip of entry #{}", snapshot[1].sequence);
    snapshot[1].ip = Some("10.0.0.1".to_string());

    let report = verify_chain(
        &request,
        &snapshot,
        directory.original_document(&request).as_deref(),
        |token| directory.signer_values(&request, token),
    )?;

    match &report.first_divergence {
        Some(divergence) => {
            println!("Divergence detected:");
            println!("{}", serde_json::to_string_pretty(divergence).unwrap_or_default());
        }
        None => println!("Unexpected: tampered chain verified clean"),
    }
    println!();
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("SIGTRAIL — Tamper-evident Audit Trail");
    println!("Signature-request Demo");
    println!("=====================================");
    println!();
    println!("Per request, every create/sign entry links to its predecessor:");
    println!("  hash = SHA256(seed ++ canonical(entry fields + signer values))");
    println!("  seed = previous link, or the original document bytes at genesis");
    println!();
}
