use std::fmt::Write as _;
use std::path::Path;
use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::info;

use super::workbook::file_stem;
use super::QuizResult;
use super::Student;
use crate::error::LabError;
use crate::error::Result;

/// Completion certificate for a passing, identified student.
#[derive(Clone, Debug)]
pub struct Certificate {
  pub lab_title: String,
  pub student: Student,
  pub score: u32,
  pub total: u32,
  pub issued_on: NaiveDate,
  pub instructor: Option<String>,
}

impl Certificate {
  /// Issue a certificate, or explain why the student is not eligible.
  pub fn issue(
    lab_title: &str,
    student: &Student,
    result: &QuizResult,
    pass_mark: u32,
    issued_on: NaiveDate,
    instructor: Option<&str>,
  ) -> Result<Self> {
    if !student.is_identified() {
      return Err(LabError::invalid("student", "name and id are required"));
    }
    if !result.passed(pass_mark) {
      return Err(LabError::invalid(
        "score",
        format!("{} is below the pass mark of {pass_mark}", result.score),
      ));
    }
    Ok(Self {
      lab_title: lab_title.into(),
      student: student.clone(),
      score: result.score,
      total: result.total,
      issued_on,
      instructor: instructor.map(str::to_string),
    })
  }

  #[must_use]
  pub fn to_html(&self) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Certificate of Completion</title></head>\n");
    html.push_str("<body style=\"font-family: Helvetica, sans-serif; text-align: center;\">\n");
    html.push_str("<h1>CERTIFICATE OF COMPLETION</h1>\n");
    let _ = writeln!(html, "<h2>{}</h2>", escape(&self.lab_title));
    let _ = writeln!(html, "<p>Student: <strong>{}</strong></p>", escape(&self.student.name));
    let _ = writeln!(html, "<p>ID: {}</p>", escape(&self.student.id));
    let _ = writeln!(html, "<p>Score: {}/{}</p>", self.score, self.total);
    let _ = writeln!(html, "<p>Date: {}</p>", self.issued_on.format("%d %B %Y"));
    if let Some(instructor) = &self.instructor {
      let _ = writeln!(html, "<p>Instructor: {}</p>", escape(instructor));
    }
    html.push_str("</body>\n</html>\n");
    html
  }

  /// Write to `<dir>/<id>_certificate.html`.
  pub fn write_html(&self, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{}_certificate.html", file_stem(&self.student)?));
    std::fs::write(&path, self.to_html())?;
    info!(path = %path.display(), score = self.score, "certificate written");
    Ok(path)
  }
}

fn escape(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      _ => out.push(c),
    }
  }
  out
}
