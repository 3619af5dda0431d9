use crate::cmd::load_payload;
use crate::exit_codes;
use crate::output::{print_error, print_result, OutputFormat};
use crate::{OutputArgs, PayloadArgs};

pub async fn decode_cmd(args: &PayloadArgs, output: OutputArgs) -> i32 {
    let payload = match load_payload(args) {
        Ok(p) => p,
        Err(e) => {
            print_error(output.format, output.quiet, &e);
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let tables = match payload.decode() {
        Ok(t) => t,
        Err(e) => {
            print_error(output.format, output.quiet, &format!("failed to decode tables: {e}"));
            return exit_codes::VALIDATION_FAILED;
        }
    };

    if output.format == OutputFormat::Text && !output.quiet {
        for (operation_id, batch) in tables.operations.iter() {
            let url = tables.endpoints.endpoint_for(batch).unwrap_or("<no endpoint>");
            println!("{operation_id} -> batch {batch} ({url})");
        }
    } else {
        print_result(output.format, output.quiet, &tables);
    }
    exit_codes::SUCCESS
}
