use std::path::PathBuf;

use anyhow::Result;
use canvas_question_import::helpers::{
    read_data_dir, read_dir_entry_document, read_document, write_data,
};
use canvas_question_import::Options;

pub fn convert(data_path: PathBuf, locale: String, output: Option<PathBuf>) -> Result<()> {
    let options = Options { locale };

    let mut documents = Vec::new();
    if data_path.is_dir() {
        for dir_entry in read_data_dir(data_path)? {
            let dir_entry = dir_entry?;
            if dir_entry.path().extension().map_or(false, |ext| ext == "xml") {
                documents.push(read_dir_entry_document(dir_entry)?);
            }
        }
    } else {
        documents.push(read_document(&data_path)?);
    }

    for document in documents {
        let conversion = canvas_question_import::convert(&document, &options)?;
        let rendered = serde_json::to_string_pretty(&conversion)?;

        match &output {
            Some(path) => write_data(path.clone(), rendered)?,
            None => println!("{rendered}"),
        }
    }

    Ok(())
}
