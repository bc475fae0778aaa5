/*
 * (c) Dennis Marttinen 2022
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Pairing students across class sections. Every student may be paired with a student of the
//! same grade from a different section, and as many students as possible should get a partner,
//! which is exactly a maximum matching of the eligibility graph.

use std::fmt;
use std::fs;
use std::path::Path;
use log::info;
use crate::algorithms::EdmondsBlossom;
use crate::error::{GraphError, RosterError};
use crate::graph::Graph;

// Header rows some roster exports carry
const HEADERS: [&str; 4] = ["Last Name", "Last", "First", "First Name"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Student {
    pub first_name: String,
    pub last_name: String,
    /// Class section, taken from the roster file name
    pub section: String,
    /// 0 is kindergarten
    pub grade: u8,
}

impl Student {
    /// Students can be partners if they share a grade but not a section
    pub fn eligible_partner(&self, other: &Student) -> bool {
        self.grade == other.grade && self.section != other.section
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grade = match self.grade {
            0 => "K".to_string(),
            g => g.to_string(),
        };

        write!(f, "({}, {}, {}/{})", self.last_name, self.first_name, grade, self.section)
    }
}

/// Parse a roster file name of the form `G<grade>-<Section>.csv` into its grade and section
pub fn parse_file_name(name: &str) -> Result<(u8, String), RosterError> {
    let invalid = || RosterError::FileName(name.into());

    let stem = name.strip_suffix(".csv").ok_or_else(invalid)?;
    let rest = stem.strip_prefix('G').ok_or_else(invalid)?;
    let (grade, section) = rest.split_once('-').ok_or_else(invalid)?;

    let grade = match grade {
        "K" => 0,
        "1" | "2" | "3" | "4" | "5" => grade.parse().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    if section.is_empty() || !section.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid());
    }

    Ok((grade, section.into()))
}

/// Parse the contents of a roster file, one `Last,First` row per student. Blank and header rows
/// are skipped.
pub fn parse_roster(file_name: &str, contents: &str) -> Result<Vec<Student>, RosterError> {
    let (grade, section) = parse_file_name(file_name)?;
    let mut students = Vec::new();

    for (i, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        // Trailing empty fields are dropped, so "Last,First," is still a valid row
        let mut fields: Vec<_> = line.split(',').map(str::trim).collect();
        while fields.last().is_some_and(|f| f.is_empty()) {
            fields.pop();
        }

        let invalid = || RosterError::Row { file: file_name.into(), line: i + 1, row: line.into() };
        let [last, first] = fields[..] else {
            return Err(invalid());
        };

        if last.is_empty() || first.is_empty() {
            return Err(invalid());
        }

        if HEADERS.contains(&last) {
            continue;
        }

        students.push(Student {
            first_name: first.into(),
            last_name: last.into(),
            section: section.clone(),
            grade,
        });
    }

    Ok(students)
}

/// Load all students from the given roster files
pub fn load_rosters<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Student>, RosterError> {
    let mut students = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| RosterError::FileName(path.display().to_string()))?;

        let contents = fs::read_to_string(path)
            .map_err(|source| RosterError::Io { path: path.into(), source })?;

        students.extend(parse_roster(name, &contents)?);
    }

    Ok(students)
}

/// The graph with one vertex per student, in order, and an edge between eligible partners
pub fn eligibility_graph(students: &[Student]) -> Result<Graph, GraphError> {
    let edges = students.iter().enumerate().flat_map(|(i, s)| {
        students[i + 1..]
            .iter()
            .enumerate()
            .filter(move |(_, t)| s.eligible_partner(t))
            .map(move |(j, _)| (i, i + 1 + j))
    });

    Graph::from_edges(students.len(), edges)
}

#[derive(Clone, Debug)]
pub struct Pairing {
    pub pairs: Vec<(Student, Student)>,
    pub unmatched: Vec<Student>,
}

/// The pairing report: one pair per line, then the unmatched students
impl fmt::Display for Pairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (a, b) in &self.pairs {
            writeln!(f, "{a} <-> {b}")?;
        }

        writeln!(f, "\nUnmatched:")?;
        if self.unmatched.is_empty() {
            writeln!(f, "None!")?;
        }

        for student in &self.unmatched {
            writeln!(f, "{student}")?;
        }

        Ok(())
    }
}

/// Pair up as many students as possible
pub fn pair_students(students: &[Student]) -> Result<Pairing, RosterError> {
    let graph = eligibility_graph(students)?;
    let outcome = EdmondsBlossom::solve(&graph)?;

    let pairs = outcome
        .matching
        .pairs()
        .into_iter()
        .map(|(a, b)| (students[a].clone(), students[b].clone()))
        .collect();

    let unmatched: Vec<_> = outcome
        .matching
        .free_vertices()
        .map(|v| students[v].clone())
        .collect();

    info!("paired {} of {} students", students.len() - unmatched.len(), students.len());
    Ok(Pairing { pairs, unmatched })
}
