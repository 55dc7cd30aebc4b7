use std::{
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use anyhow::Context;
use csv::{ReaderBuilder, Writer};

use crate::{documents::DocumentRecord, types::CityTarget, utils::city_slug};

/// Reads `city_name,scrape_url` pairs from a headerless CSV.
pub fn read_cities<R: Read>(input: R) -> anyhow::Result<Vec<CityTarget>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut cities = vec![];
    for (line, record) in reader.deserialize::<CityTarget>().enumerate() {
        let city = record.context(format!("invalid city entry on line {}", line + 1))?;
        cities.push(city);
    }
    Ok(cities)
}

pub fn read_cities_file(path: &Path) -> anyhow::Result<Vec<CityTarget>> {
    let file = fs::File::open(path).context(format!("could not open city list {:?}", path))?;
    read_cities(file)
}

/// Writes the documents of one city to `<save_dir>/<city-slug>.csv`.
pub fn write_doc_list(
    save_dir: &Path,
    city_name: &str,
    docs: &[DocumentRecord],
) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(save_dir)
        .context(format!("could not create output directory {:?}", save_dir))?;
    let path = save_dir.join(format!("{}.csv", city_slug(city_name)));

    let mut writer =
        Writer::from_path(&path).context(format!("could not create {:?}", path))?;
    if docs.is_empty() {
        writer.write_record(["city", "date", "committee", "doc_type", "url", "doc_format"])?;
    }
    for doc in docs {
        writer.serialize(doc)?;
    }
    writer.flush()?;

    debug!("wrote {} documents to {:?}", docs.len(), path);
    Ok(path)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::documents::DocType;

    #[test]
    fn reads_headerless_city_list() {
        let input = "San Jose, https://sanjose.legistar.com/Calendar.aspx\nOakland,https://oakland.legistar.com/Calendar.aspx\n";
        let cities = read_cities(input.as_bytes()).unwrap();
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].city_name, "San Jose");
        assert_eq!(
            cities[0].scrape_url,
            "https://sanjose.legistar.com/Calendar.aspx"
        );
    }

    #[test]
    fn rejects_incomplete_city_entries() {
        assert!(read_cities("San Jose\n".as_bytes()).is_err());
    }

    #[test]
    fn writes_one_file_per_city() {
        let dir = tempfile::tempdir().unwrap();
        let save_dir = dir.path().join("nested");
        let docs = vec![DocumentRecord {
            city: "San Jose".into(),
            date: "2020-01-14".into(),
            committee: "City Council".into(),
            doc_type: DocType::Agenda,
            url: "https://sanjose.legistar.com/View.ashx?M=A&ID=1".into(),
            doc_format: "pdf".into(),
        }];

        let path = write_doc_list(&save_dir, "San Jose", &docs).unwrap();
        assert_eq!(path, save_dir.join("san-jose.csv"));

        let written = fs::read_to_string(path).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("city,date,committee,doc_type,url,doc_format")
        );
        assert_eq!(
            lines.next(),
            Some("San Jose,2020-01-14,City Council,Agenda,https://sanjose.legistar.com/View.ashx?M=A&ID=1,pdf")
        );
        assert_eq!(lines.next(), None);
    }
}
