use std::path::Path;
use std::path::PathBuf;

use tracing::info;

use super::Answer;
use super::Student;
use super::QUESTION_COUNT;
use crate::error::LabError;
use crate::error::Result;

/// File stem safe for use as a path component.
pub(crate) fn file_stem(student: &Student) -> Result<String> {
  let id = student.id.trim();
  if id.is_empty() {
    return Err(LabError::invalid("student.id", "must not be empty"));
  }
  if id.contains(['/', '\\']) || id == "." || id == ".." {
    return Err(LabError::invalid("student.id", format!("`{id}` is not a valid file name")));
  }
  Ok(id.to_string())
}

/// Write one row per question, labelled `Q1`..`Q10`, to `<dir>/<id>_workings.csv`.
///
/// Nothing is written unless there is exactly one answer per question.
pub fn write_workbook(dir: &Path, student: &Student, answers: &[Answer]) -> Result<PathBuf> {
  if answers.len() != QUESTION_COUNT {
    return Err(LabError::invalid(
      "answers",
      format!("expected {QUESTION_COUNT} answers, got {}", answers.len()),
    ));
  }
  let path = dir.join(format!("{}_workings.csv", file_stem(student)?));
  let mut writer = csv::Writer::from_path(&path)?;
  writer.write_record(["Student Name", "Student ID", "Question", "Answer"])?;
  for (i, answer) in answers.iter().enumerate() {
    writer.write_record([
      student.name.as_str(),
      student.id.as_str(),
      &format!("Q{}", i + 1),
      &answer.to_string(),
    ])?;
  }
  writer.flush()?;
  info!(path = %path.display(), "workbook written");
  Ok(path)
}
