use clap::Subcommand;

use super::{open_engine, print_json};

#[derive(Subcommand)]
pub enum TodoAction {
    /// Add a checklist item
    Add {
        /// Item text
        text: String,
    },
    /// List checklist items
    List,
    /// Mark an item done
    Done {
        /// Item ID
        id: u64,
    },
    /// Remove an item
    Remove {
        /// Item ID
        id: u64,
    },
}

pub fn run(action: TodoAction) -> Result<(), Box<dyn std::error::Error>> {
    let engine = open_engine()?;
    let checklist = engine.checklist();

    match action {
        TodoAction::Add { text } => {
            let id = checklist.add(text);
            println!("Item created: {id}");
        }
        TodoAction::List => {
            print_json(&checklist.list())?;
        }
        TodoAction::Done { id } => match checklist.mark_done(id) {
            Some(item) => print_json(&item)?,
            None => return Err(format!("item not found: {id}").into()),
        },
        TodoAction::Remove { id } => {
            if checklist.remove(id) {
                println!("Item removed: {id}");
            } else {
                return Err(format!("item not found: {id}").into());
            }
        }
    }
    Ok(())
}
