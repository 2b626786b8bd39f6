//! Rendering of finished tasks

use std::io::{self, Write};

use serde::Serialize;

use fleet_core::TaskError;
use fleet_tasks::Task;

use super::table::Table;

/// Keep what follows the last carriage return of a line.
///
/// Progress meters redraw with `\r`; only their final frame is kept. A lone
/// trailing `\r` is a line ending, not a redraw.
pub fn trim_cr(line: &str) -> &str {
    let line = line.strip_suffix('\r').unwrap_or(line);
    match line.rfind('\r') {
        Some(i) => &line[i + 1..],
        None => line,
    }
}

/// One block per task that failed or printed something: a header with the
/// directory and failure, then each output line indented by a tab.
pub fn write_long<W: Write>(out: &mut W, tasks: &[Task]) -> io::Result<()> {
    for task in tasks {
        if task.is_success() && task.output.is_empty() {
            continue;
        }
        match &task.error {
            Some(err) => writeln!(out, "{} {}", task.target, err)?,
            None => writeln!(out, "{}", task.target)?,
        }
        for line in task.output_text().lines() {
            writeln!(out, "\t{}", trim_cr(line))?;
        }
    }
    Ok(())
}

/// Aligned `<dir> <failure>` and `<dir> <line>` rows, one per fact
pub fn write_short<W: Write>(out: &mut W, tasks: &[Task]) -> io::Result<()> {
    let mut table = Table::new();
    for task in tasks {
        let dir = task.target.to_string();
        if let Some(err) = &task.error {
            table.row([dir.clone(), err.to_string()]);
        }
        for line in task.output_text().lines() {
            table.row([dir.clone(), trim_cr(line).to_string()]);
        }
    }
    table.write_to(out)
}

/// JSON view of a finished task
#[derive(Debug, Serialize)]
pub struct TaskReport<'a> {
    pub dir: String,
    pub branch: &'a str,
    pub url: &'a str,
    pub ok: bool,
    pub error: Option<String>,
    pub exit_code: Option<i32>,
    pub output: String,
}

impl<'a> From<&'a Task> for TaskReport<'a> {
    fn from(task: &'a Task) -> Self {
        Self {
            dir: task.target.to_string(),
            branch: &task.target.branch,
            url: &task.target.url,
            ok: task.is_success(),
            error: task.error.as_ref().map(ToString::to_string),
            exit_code: task.error.as_ref().and_then(TaskError::exit_code),
            output: task.output_text().into_owned(),
        }
    }
}

/// Pretty-printed JSON array of every task, in batch order
pub fn write_json<W: Write>(out: &mut W, tasks: &[Task]) -> serde_json::Result<()> {
    let reports: Vec<TaskReport<'_>> = tasks.iter().map(TaskReport::from).collect();
    serde_json::to_writer_pretty(&mut *out, &reports)?;
    writeln!(out).map_err(serde_json::Error::io)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::Target;
    use std::os::unix::process::ExitStatusExt;
    use std::process::ExitStatus;

    fn task(dir: &str, output: &str, error: Option<TaskError>) -> Task {
        let mut task = Task::new(Target::new(dir, "main", "git@example.com:x.git"));
        task.output = output.as_bytes().to_vec();
        task.error = error;
        task
    }

    fn failed() -> Option<TaskError> {
        Some(TaskError::Exit(ExitStatus::from_raw(1 << 8)))
    }

    fn render<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut out = Vec::new();
        write(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_trim_cr() {
        assert_eq!(trim_cr("plain"), "plain");
        assert_eq!(trim_cr("10%\r50%\r100% done"), "100% done");
        assert_eq!(trim_cr("windows\r"), "windows");
        assert_eq!(trim_cr("a\rb\r"), "b");
    }

    #[test]
    fn test_long_report_skips_quiet_successes() {
        let tasks = vec![
            task(".", "", None),
            task("lib", "one\ntwo\n", None),
            task("app", "fatal: nope\n", failed()),
            task("empty-failure", "", failed()),
        ];
        let text = render(|out| write_long(out, &tasks));
        assert_eq!(
            text,
            "lib\n\tone\n\ttwo\napp exit status: 1\n\tfatal: nope\nempty-failure exit status: 1\n"
        );
    }

    #[test]
    fn test_long_report_collapses_progress_lines() {
        let tasks = vec![task("lib", "Receiving 10%\rReceiving 100%\ndone\n", None)];
        let text = render(|out| write_long(out, &tasks));
        assert_eq!(text, "lib\n\tReceiving 100%\n\tdone\n");
    }

    #[test]
    fn test_short_report() {
        let tasks = vec![
            task(".", "clean\n", None),
            task("app", "a\nb\n", failed()),
            task("lib", "", None),
        ];
        let text = render(|out| write_short(out, &tasks));
        assert_eq!(
            text,
            ".         clean\napp       exit status: 1\napp       a\napp       b\n"
        );
    }

    #[test]
    fn test_json_report() {
        let tasks = vec![task("lib", "x\n", None), task("app", "", failed())];
        let mut out = Vec::new();
        write_json(&mut out, &tasks).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["dir"], "lib");
        assert_eq!(value[0]["ok"], true);
        assert_eq!(value[0]["output"], "x\n");
        assert!(value[0]["error"].is_null());
        assert_eq!(value[1]["ok"], false);
        assert_eq!(value[1]["error"], "exit status: 1");
        assert_eq!(value[1]["exit_code"], 1);
        assert!(value[0]["exit_code"].is_null());
        assert_eq!(value[1]["branch"], "main");
    }
}
