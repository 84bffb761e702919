//! Table creation ordering.

use std::collections::HashMap;

use smol_str::SmolStr;
use strata_schema::{Model, Schema};

use crate::error::{MigrateError, MigrateResult};

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    White,
    Gray,
    Black,
}

/// Order models so every foreign key target is created before the table
/// that references it.
///
/// Iterative depth-first topological sort. A model reached while still
/// on the DFS stack (gray) is a cycle, which fails fast: no creation
/// order exists that would satisfy both foreign keys.
pub fn creation_order(schema: &Schema) -> MigrateResult<Vec<&Model>> {
    let mut marks: HashMap<&SmolStr, Mark> =
        schema.models.keys().map(|name| (name, Mark::White)).collect();
    let mut ordered = Vec::with_capacity(schema.models.len());

    enum Frame<'a> {
        Enter(&'a SmolStr),
        Exit(&'a SmolStr),
    }

    for root in schema.models.keys() {
        if marks[root] != Mark::White {
            continue;
        }

        let mut stack = vec![Frame::Enter(root)];
        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(name) => {
                    match marks[name] {
                        Mark::Gray => {
                            return Err(MigrateError::dependency_cycle(name.as_str()));
                        }
                        Mark::Black => continue,
                        Mark::White => {}
                    }
                    marks.insert(name, Mark::Gray);
                    stack.push(Frame::Exit(name));

                    if let Some(model) = schema.models.get(name) {
                        for dependency in model.dependencies() {
                            // Self-references are legal SQL; skip them.
                            if dependency == *name {
                                continue;
                            }
                            if let Some((target, _)) = schema.models.get_key_value(&dependency) {
                                match marks[target] {
                                    Mark::White => stack.push(Frame::Enter(target)),
                                    Mark::Gray => {
                                        return Err(MigrateError::dependency_cycle(
                                            target.as_str(),
                                        ));
                                    }
                                    Mark::Black => {}
                                }
                            }
                        }
                    }
                }
                Frame::Exit(name) => {
                    marks.insert(name, Mark::Black);
                    if let Some(model) = schema.models.get(name) {
                        ordered.push(model);
                    }
                }
            }
        }
    }

    Ok(ordered)
}
