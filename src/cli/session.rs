use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;

use crate::application::{AppError, MachineService};
use crate::domain::{Catalog, Units, format_units};
use crate::io::{ExportFormat, Exporter};

/// Commands accepted at the machine prompt, one per line.
#[derive(Parser, Debug, PartialEq)]
#[command(name = "machine", no_binary_name = true, disable_version_flag = true)]
pub enum SessionCommand {
    /// Insert money (whole units)
    Deposit {
        #[arg(allow_hyphen_values = true, default_value = "")]
        amount: String,
    },

    /// Pay out the whole balance
    Withdraw,

    /// Buy a random souvenir from a price tier
    #[command(alias = "dispense")]
    Buy {
        /// Tier price (e.g. 10, 20, 30, 40)
        tier: Units,
    },

    /// Show the current balance
    Balance,

    /// List the souvenirs on sale
    Catalog,

    /// List the operations of this session
    History,

    /// Show session totals
    Summary,

    /// Write the session journal to a file
    Export {
        path: PathBuf,

        #[arg(short, long, value_enum, default_value_t)]
        format: ExportFormat,
    },

    /// Leave the machine
    #[command(alias = "exit")]
    Quit,
}

/// Interactive front end of the machine: reads commands, renders results.
pub struct Session<'a, R: Rng> {
    service: &'a mut MachineService<R>,
    prompt: bool,
}

impl<'a, R: Rng> Session<'a, R> {
    pub fn new(service: &'a mut MachineService<R>) -> Self {
        Self {
            service,
            prompt: false,
        }
    }

    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// Process commands until `quit` or end of input.
    pub fn run<I: BufRead, O: Write>(&mut self, input: I, mut output: O) -> Result<()> {
        self.show_prompt(&mut output)?;

        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.is_empty() {
                self.show_prompt(&mut output)?;
                continue;
            }

            match SessionCommand::try_parse_from(tokens) {
                Ok(SessionCommand::Quit) => break,
                Ok(command) => self.execute(command, &mut output)?,
                Err(e) => write!(output, "{e}")?,
            }
            self.show_prompt(&mut output)?;
        }

        writeln!(output, "Goodbye!")?;
        output.flush()?;
        Ok(())
    }

    fn show_prompt<O: Write>(&self, output: &mut O) -> Result<()> {
        if self.prompt {
            write!(output, "> ")?;
            output.flush()?;
        }
        Ok(())
    }

    /// Run one command. Ledger rejections are shown to the user, not returned.
    pub fn execute<O: Write>(&mut self, command: SessionCommand, output: &mut O) -> Result<()> {
        let result = match command {
            SessionCommand::Deposit { amount } => self.deposit(&amount, output),
            SessionCommand::Withdraw => self.withdraw(output),
            SessionCommand::Buy { tier } => self.buy(tier, output),
            SessionCommand::Balance => {
                writeln!(output, "Balance: {}", format_units(self.service.balance()))?;
                Ok(())
            }
            SessionCommand::Catalog => {
                print_catalog(self.service.catalog(), output)?;
                Ok(())
            }
            SessionCommand::History => {
                self.history(output)?;
                Ok(())
            }
            SessionCommand::Summary => {
                self.summary(output)?;
                Ok(())
            }
            SessionCommand::Export { path, format } => self.export(&path, format, output),
            SessionCommand::Quit => Ok(()),
        };

        if let Err(e) = result {
            writeln!(output, "Error: {e}")?;
        }
        Ok(())
    }

    fn deposit<O: Write>(&mut self, amount: &str, output: &mut O) -> Result<(), AppError> {
        let receipt = self.service.deposit_input(amount)?;
        writeln!(output, "Deposited {}", format_units(receipt.amount))?;
        writeln!(output, "Balance: {}", format_units(receipt.balance))?;
        Ok(())
    }

    fn withdraw<O: Write>(&mut self, output: &mut O) -> Result<(), AppError> {
        let receipt = self.service.withdraw()?;
        writeln!(output, "Dispensed {}", format_units(receipt.amount))?;
        writeln!(output, "Balance: {}", format_units(self.service.balance()))?;
        Ok(())
    }

    fn buy<O: Write>(&mut self, tier: Units, output: &mut O) -> Result<(), AppError> {
        let receipt = self.service.dispense(tier)?;
        writeln!(
            output,
            "Souvenir dispensed: {} (price {})",
            receipt.item.name,
            format_units(receipt.price)
        )?;
        writeln!(output, "Image: {}", receipt.item.image)?;
        writeln!(output, "Balance: {}", format_units(receipt.balance))?;
        Ok(())
    }

    fn history<O: Write>(&self, output: &mut O) -> std::io::Result<()> {
        let journal = self.service.journal();
        if journal.is_empty() {
            return writeln!(output, "No operations yet.");
        }

        for op in journal {
            let item = op
                .item
                .as_ref()
                .map(|i| format!("  {}", i.name))
                .unwrap_or_default();
            writeln!(
                output,
                "#{:<3} {:<10} {:>8}  balance {:>8}{}",
                op.sequence,
                op.kind,
                format_units(op.amount),
                format_units(op.balance_after),
                item
            )?;
        }
        Ok(())
    }

    fn summary<O: Write>(&self, output: &mut O) -> std::io::Result<()> {
        let summary = self.service.summary();
        let deposited = format_units(summary.total_deposited);
        let withdrawn = format_units(summary.total_withdrawn);
        writeln!(output, "Deposited:  {}", deposited)?;
        writeln!(output, "Withdrawn:  {}", withdrawn)?;
        writeln!(output, "Spent:      {}", format_units(summary.total_spent))?;
        writeln!(output, "Souvenirs:  {}", summary.souvenirs_dispensed)?;
        for tier in &summary.per_tier {
            writeln!(output, "  {:>8}: {}", format_units(tier.price), tier.count)?;
        }
        writeln!(output, "Balance:    {}", format_units(summary.balance))?;
        Ok(())
    }

    fn export<O: Write>(
        &self,
        path: &Path,
        format: ExportFormat,
        output: &mut O,
    ) -> Result<(), AppError> {
        let count = export_journal(self.service, path, format)?;
        let path = path.display();
        writeln!(output, "Exported {} operation(s) to {}", count, path)?;
        Ok(())
    }
}

/// Write the service's journal to `path`.
pub fn export_journal<R: Rng>(
    service: &MachineService<R>,
    path: &Path,
    format: ExportFormat,
) -> Result<usize, AppError> {
    let file = BufWriter::new(File::create(path)?);
    Exporter::new(service.journal(), service.balance()).export(format, file)
}

/// Render the catalog as a price-ordered list.
pub fn print_catalog<O: Write>(catalog: &Catalog, output: &mut O) -> std::io::Result<()> {
    for (price, items) in catalog.iter() {
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        writeln!(output, "{:>8}  {}", format_units(price), names.join(", "))?;
    }
    Ok(())
}
