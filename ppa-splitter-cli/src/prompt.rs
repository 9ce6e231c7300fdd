//! Interactive confirmation before clearing the output directory

use std::io::{self, BufRead, Write};
use std::path::Path;

/// Ask whether `dir` may be removed until the answer is `y` or `n`
///
/// Returns `Ok(false)` if the input ends before a valid answer.
pub fn confirm_clear<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    dir: &Path,
) -> io::Result<bool> {
    let mut message = format!(
        "Are you sure you want to remove data in {} ? [y/n]\t>\t",
        dir.display()
    );
    let mut answer = String::new();

    loop {
        write!(output, "{message}")?;
        output.flush()?;

        answer.clear();
        if input.read_line(&mut answer)? == 0 {
            return Ok(false);
        }

        match answer.trim().to_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => {
                message = format!(
                    "Are you sure you want to remove data in {} ? [y/n] (your previous answer was wrong)\t>\t",
                    dir.display()
                );
            }
        }
    }
}
