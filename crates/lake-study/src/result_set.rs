//! Result-set files
//!
//! One file per optimization run:
//!
//! ```text
//! #Borg Optimization Results
//! #First 100 are the decision variables, last 4 are the objective values
//! 0.0123 0.0456 ... -0.2841 0.0912 -1 -1
//! ...
//! #
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use lake_common::{LakeError, Result};
use serde::{Deserialize, Serialize};

use crate::archive::Solution;

const TITLE: &str = "#Borg Optimization Results";
const SENTINEL: &str = "#";

/// One parsed line of a result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub variables: Vec<f64>,
    pub objectives: Vec<f64>,
}

fn layout_line(nvars: usize, nobjs: usize) -> String {
    format!(
        "#First {} are the decision variables, last {} are the objective values",
        nvars, nobjs
    )
}

/// Write the approximation set of one run
pub fn write_result_set(
    path: &Path,
    solutions: &[Solution],
    nvars: usize,
    nobjs: usize,
) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{}", TITLE)?;
    writeln!(out, "{}", layout_line(nvars, nobjs))?;

    for solution in solutions {
        if solution.variables.len() != nvars || solution.objectives().len() != nobjs {
            return Err(LakeError::Storage(format!(
                "solution shape {}+{} does not match header {}+{}",
                solution.variables.len(),
                solution.objectives().len(),
                nvars,
                nobjs
            )));
        }
        let line = solution
            .variables
            .iter()
            .chain(solution.objectives())
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{}", line)?;
    }

    write!(out, "{}", SENTINEL)?;
    out.flush()?;
    Ok(())
}

fn parse_layout(line: &str) -> Option<(usize, usize)> {
    let rest = line.strip_prefix("#First ")?;
    let (nvars, rest) = rest.split_once(" are the decision variables, last ")?;
    let (nobjs, _) = rest.split_once(" are the objective values")?;
    Some((nvars.trim().parse().ok()?, nobjs.trim().parse().ok()?))
}

/// Read a result set back; the file must end with the `#` sentinel
pub fn read_result_set(path: &Path) -> Result<Vec<ResultRow>> {
    let reader = BufReader::new(File::open(path)?);
    let mut layout = None;
    let mut rows = Vec::new();
    let mut terminated = false;

    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if terminated && !line.is_empty() {
            return Err(LakeError::Storage(format!(
                "{}: content after end sentinel on line {}",
                path.display(),
                lineno + 1
            )));
        }
        if line == SENTINEL {
            terminated = true;
            continue;
        }
        if line.is_empty() {
            continue;
        }
        if line.starts_with('#') {
            if layout.is_none() {
                layout = parse_layout(line);
            }
            continue;
        }

        let (nvars, nobjs) = layout.ok_or_else(|| {
            LakeError::Storage(format!("{}: missing layout header", path.display()))
        })?;
        let values = line
            .split_whitespace()
            .map(str::parse::<f64>)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| {
                LakeError::Storage(format!("{}:{}: {}", path.display(), lineno + 1, e))
            })?;
        if values.len() != nvars + nobjs {
            return Err(LakeError::Storage(format!(
                "{}:{}: expected {} values, found {}",
                path.display(),
                lineno + 1,
                nvars + nobjs,
                values.len()
            )));
        }
        let (variables, objectives) = values.split_at(nvars);
        rows.push(ResultRow {
            variables: variables.to_vec(),
            objectives: objectives.to_vec(),
        });
    }

    if !terminated {
        return Err(LakeError::Storage(format!(
            "{}: missing end sentinel",
            path.display()
        )));
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lake_common::Evaluation;

    fn solution(vars: Vec<f64>, objs: Vec<f64>) -> Solution {
        Solution::new(vars, Evaluation::new(objs, vec![0.0]))
    }

    #[test]
    fn test_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1.set");
        let solutions = vec![
            solution(vec![0.01, 0.1], vec![-0.25, 0.5, -1.0, -0.875]),
            solution(vec![0.05, 0.02], vec![-0.125, 0.25, -0.5, -1.0]),
        ];
        write_result_set(&path, &solutions, 2, 4).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "#Borg Optimization Results");
        assert_eq!(
            lines[1],
            "#First 2 are the decision variables, last 4 are the objective values"
        );
        assert_eq!(lines[2], "0.01 0.1 -0.25 0.5 -1 -0.875");
        assert_eq!(lines.last(), Some(&"#"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("2.set");
        let solutions = vec![solution(vec![0.03, 0.07, 0.011], vec![-0.3, 0.2])];
        write_result_set(&path, &solutions, 3, 2).unwrap();

        let rows = read_result_set(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].variables, vec![0.03, 0.07, 0.011]);
        assert_eq!(rows[0].objectives, vec![-0.3, 0.2]);
    }

    #[test]
    fn test_empty_set_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("3.set");
        write_result_set(&path, &[], 100, 4).unwrap();
        assert!(read_result_set(&path).unwrap().is_empty());
    }

    #[test]
    fn test_missing_sentinel_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("4.set");
        std::fs::write(
            &path,
            "#Borg Optimization Results\n#First 1 are the decision variables, last 1 are the objective values\n0.5 0.25\n",
        )
        .unwrap();
        assert!(matches!(read_result_set(&path), Err(LakeError::Storage(_))));
    }

    #[test]
    fn test_shape_mismatch_rejected_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("5.set");
        let solutions = vec![solution(vec![0.03], vec![-0.3, 0.2])];
        assert!(write_result_set(&path, &solutions, 2, 2).is_err());
    }
}
