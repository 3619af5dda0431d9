use std::path::Path;

use serde::Serialize;
use shardgate_build::{BuildPipeline, DeploymentManifest};

use crate::cmd::build_error_code;
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{BuildArgs, OutputArgs};

#[derive(Serialize)]
struct BuildSummary<'a> {
    project: &'a str,
    operations: usize,
    routed: usize,
    batches: usize,
    provisioned: usize,
    warnings: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    manifest: Option<String>,
}

pub async fn build_cmd(args: &BuildArgs, out: Option<&Path>, output: OutputArgs) -> i32 {
    let config = match args.resolve() {
        Ok(c) => c,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let manifest = match BuildPipeline::new(config).run_from_files().await {
        Ok(m) => m,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return build_error_code(&e);
        }
    };

    let Some(path) = out else {
        print_result(output.format, output.quiet, &manifest);
        return exit_codes::SUCCESS;
    };

    let rendered = match serde_json::to_string_pretty(&manifest) {
        Ok(s) => s,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to render manifest: {e}"));
            return exit_codes::RUNTIME_ERROR;
        }
    };
    if let Err(e) = std::fs::write(path, rendered) {
        print_error(
            output.format,
            output.quiet,
            &format!("failed to write {}: {e}", path.display()),
        );
        return exit_codes::RUNTIME_ERROR;
    }

    report(&manifest, path, output);
    exit_codes::SUCCESS
}

fn report(manifest: &DeploymentManifest, path: &Path, output: OutputArgs) {
    if output.quiet {
        return;
    }
    if output.format == OutputFormat::Text {
        for batch in &manifest.batches {
            match &batch.base_url {
                Some(url) => println!(
                    "{}: {} resources -> {url}",
                    batch.surface.name,
                    batch.surface.resources.len()
                ),
                None => println!("{}: skipped (no routable operations)", batch.surface.name),
            }
        }
        for d in &manifest.diagnostics {
            eprintln!("warning: {}", d.message);
        }
        println!(
            "ok: {} of {} operations routed, manifest written to {}",
            manifest.tables.operations.len(),
            manifest.operation_count,
            path.display()
        );
        return;
    }
    let summary = BuildSummary {
        project: &manifest.project.name,
        operations: manifest.operation_count,
        routed: manifest.tables.operations.len(),
        batches: manifest.batches.len(),
        provisioned: manifest.provisioned_batches().count(),
        warnings: manifest.warning_count(),
        manifest: Some(path.display().to_string()),
    };
    print_result(output.format, false, &summary);
}
