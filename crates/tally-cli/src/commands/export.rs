use std::path::PathBuf;

use chrono::Local;
use tracing::info;

use tally_core::export::{write_export_file, ExportBackend};
use tally_core::{ExpenseStore, SummaryEngine};

use crate::app::AppContext;
use crate::cli::ExportArgs;
use crate::constants::EXPORT_FILE_PREFIX;
use crate::helpers::build_filter;
use crate::ui::{print, receipt};

/// `expenses_export_YYYYMMDD_HHMMSS.<ext>` for the current local time.
fn timestamped_file_name(backend: ExportBackend) -> String {
    format!(
        "{}_{}.{}",
        EXPORT_FILE_PREFIX,
        Local::now().format("%Y%m%d_%H%M%S"),
        backend.extension()
    )
}

pub fn handle_export(ctx: &AppContext, args: &ExportArgs) -> anyhow::Result<()> {
    let backend = ctx.export_backend(args.format.as_deref())?;
    let filter = build_filter(&args.filter)?;

    let store = ctx.open_store()?;
    let rows = SummaryEngine::new(&store).export_rows(&filter)?;
    store.close()?;

    let writer = backend.writer();
    let destination = match (&args.path, &args.out_dir) {
        (Some(path), _) => Some(PathBuf::from(path)),
        (None, Some(dir)) => {
            let dir = PathBuf::from(dir);
            std::fs::create_dir_all(&dir).map_err(|e| {
                anyhow::anyhow!("Failed to create export directory {}: {}", dir.display(), e)
            })?;
            Some(dir.join(timestamped_file_name(backend)))
        }
        (None, None) => None,
    };

    let Some(path) = destination else {
        let stdout = std::io::stdout();
        writer.write_rows(&rows, &mut stdout.lock())?;
        return Ok(());
    };

    let count = write_export_file(&path, &rows, writer.as_ref())?;
    info!(count, path = %path.display(), "exported expenses");

    if !ctx.quiet() {
        let ui_ctx = ctx.ui_context(false, None);
        let path_text = path.display().to_string();
        let count_text = count.to_string();
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Exported expenses",
                &[
                    ("Path", path_text.as_str()),
                    ("Format", backend.as_str()),
                    ("Rows", count_text.as_str()),
                ],
            ),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamped_file_name_shape() {
        let name = timestamped_file_name(ExportBackend::Csv);
        assert!(name.starts_with("expenses_export_"));
        assert!(name.ends_with(".csv"));
        // prefix + YYYYMMDD_HHMMSS + .csv
        assert_eq!(name.len(), "expenses_export_".len() + 15 + 4);

        assert!(timestamped_file_name(ExportBackend::Jsonl).ends_with(".jsonl"));
    }
}
