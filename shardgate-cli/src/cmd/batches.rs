use serde::Serialize;
use shardgate_build::{BuildError, BuildInputs};
use shardgate_core::{
    index_operations, partition, Diagnostic, OperationClassifier, OperationRole,
    OverrideTranslator,
};

use crate::cmd::build_error_code;
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{BuildArgs, OutputArgs};

#[derive(Serialize)]
struct PlannedOperation {
    operation_id: String,
    method: String,
    path: String,
    field_name: String,
    role: OperationRole,
}

#[derive(Serialize)]
struct PlannedBatch {
    index: usize,
    surface: String,
    operations: Vec<PlannedOperation>,
}

#[derive(Serialize)]
struct BatchesResult {
    max_resources_per_stack: usize,
    batches: Vec<PlannedBatch>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    diagnostics: Vec<Diagnostic>,
}

pub async fn batches_cmd(args: &BuildArgs, output: OutputArgs) -> i32 {
    let config = match args.resolve() {
        Ok(c) => c,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let result = (|| -> Result<BatchesResult, BuildError> {
        let inputs = BuildInputs::load(&config)?;
        let indexed = index_operations(&inputs.description)?;
        let translator = OverrideTranslator::new(config.field_names.clone());
        let (descriptors, diagnostics) = OperationClassifier::new(&inputs.schema)
            .with_translator(&translator)
            .classify_all(indexed);
        let batches = partition(descriptors, config.max_resources_per_stack)?
            .into_iter()
            .map(|batch| PlannedBatch {
                index: batch.index,
                surface: config.surface_name(batch.index),
                operations: batch
                    .operations
                    .into_iter()
                    .map(|op| PlannedOperation {
                        operation_id: op.operation_id,
                        method: op.http_method.to_string(),
                        path: op.path,
                        field_name: op.field_name,
                        role: op.role,
                    })
                    .collect(),
            })
            .collect();
        Ok(BatchesResult {
            max_resources_per_stack: config.max_resources_per_stack,
            batches,
            diagnostics,
        })
    })();

    let result = match result {
        Ok(r) => r,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return build_error_code(&e);
        }
    };

    if output.format == OutputFormat::Text && !output.quiet {
        for batch in &result.batches {
            println!("{} ({} operations)", batch.surface, batch.operations.len());
            for op in &batch.operations {
                println!(
                    "  {:<6} {} -> {}.{}",
                    op.method,
                    op.path,
                    op.role.type_name(),
                    op.field_name
                );
            }
        }
        for d in &result.diagnostics {
            eprintln!("warning: {}", d.message);
        }
    } else {
        print_result(output.format, output.quiet, &result);
    }
    exit_codes::SUCCESS
}
