use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use anyhow::Context;

use quotation_core::export::format_money;
use quotation_core::QuoteSession;
use quotation_db::{connect_with_settings, SqlCatalogLookup};

use crate::commands::{prepare, CommandResult};
use crate::shell::{Shell, ShellOptions};

/// Runs the interactive shell on stdin, or a script file when given.
pub fn run(script: Option<&Path>) -> CommandResult {
    match script {
        Some(path) => match open_script(path) {
            Ok(reader) => run_with_io(reader, &mut io::stdout().lock(), true),
            Err(error) => CommandResult::failure("session", "script_read", format!("{error:#}"), 3),
        },
        None => run_with_io(io::stdin().lock(), &mut io::stdout().lock(), false),
    }
}

fn open_script(path: &Path) -> anyhow::Result<BufReader<File>> {
    let file = File::open(path)
        .with_context(|| format!("could not open script `{}`", path.display()))?;
    Ok(BufReader::new(file))
}

/// Shell transcript goes to `output`; the returned result summarises the
/// session once input ends.
pub fn run_with_io<R: BufRead, W: Write>(input: R, output: &mut W, echo: bool) -> CommandResult {
    let (config, runtime) = match prepare("session") {
        Ok(prepared) => prepared,
        Err(failure) => return failure,
    };

    let pool = match runtime.block_on(connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )) {
        Ok(pool) => pool,
        Err(error) => {
            return CommandResult::failure("session", "db_connectivity", error.to_string(), 4);
        }
    };

    let lookup =
        SqlCatalogLookup::from_pool(pool.clone(), config.quotation.customer_suggestion_limit);
    let options = ShellOptions { echo_commands: echo, ..ShellOptions::from_config(&config) };
    let mut shell = Shell::new(&runtime, lookup, QuoteSession::new(), options);

    let io_result = shell.run(input, output);
    let summary = shell.summary().clone();
    let totals = shell.session().totals();
    let symbol = config.quotation.currency_symbol.clone();
    drop(shell);
    runtime.block_on(pool.close());

    if let Err(error) = io_result {
        return CommandResult::failure("session", "io", error.to_string(), 3);
    }
    if let Some(failure) = &summary.export_error {
        return CommandResult::failure(
            "session",
            failure.error_class(),
            failure.to_string(),
            failure.exit_code(),
        );
    }

    let exports = if summary.exports.is_empty() {
        "nothing exported".to_string()
    } else {
        let paths =
            summary.exports.iter().map(|path| path.display().to_string()).collect::<Vec<_>>();
        format!("exported {}", paths.join(", "))
    };

    CommandResult::success(
        "session",
        format!(
            "session closed after {} commands ({} warnings); {} products, {} sections; grand total {} {}; {}",
            summary.commands,
            summary.warnings,
            totals.product_rows,
            totals.section_rows,
            symbol,
            format_money(totals.grand_total),
            exports
        ),
    )
}
