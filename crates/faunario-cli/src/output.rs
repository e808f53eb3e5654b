//! Plain-text catalog rendering for the terminal.

use faunario_core::{Animal, CatalogView, Result};
use std::collections::BTreeMap;
use std::io::Write;

/// Text renderer for catalog listings; the terminal stand-in for the card
/// grid the desktop front-end draws.
pub struct TextView<W: Write> {
    out: W,
}

impl<W: Write> TextView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> CatalogView for TextView<W> {
    fn show_catalog(&mut self, grouped: &BTreeMap<String, Vec<Animal>>) -> Result<()> {
        for (region, animals) in grouped {
            if animals.is_empty() {
                continue;
            }
            writeln!(self.out, "{}", region)?;
            for animal in animals {
                writeln!(
                    self.out,
                    "  [{}] {} ({})",
                    animal.id, animal.common_name, animal.scientific_name
                )?;
            }
        }
        Ok(())
    }

    fn show_detail(&mut self, animal: &Animal) -> Result<()> {
        writeln!(self.out, "{} ({})", animal.common_name, animal.scientific_name)?;
        writeln!(self.out, "Region: {}", animal.region)?;
        writeln!(self.out, "Image:  {}", animal.image_path)?;
        writeln!(self.out, "Model:  {}", animal.model_path)?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", animal.description)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animal(id: i64, name: &str, region: &str) -> Animal {
        Animal {
            id,
            common_name: name.to_string(),
            scientific_name: format!("{} scientificus", name),
            description: "desc".to_string(),
            model_path: format!("models/{}", name),
            image_path: format!("img/{}.png", name),
            region: region.to_string(),
        }
    }

    #[test]
    fn test_catalog_rendering_skips_empty_regions() {
        let mut grouped = BTreeMap::new();
        grouped.insert("Jalisco".to_string(), vec![]);
        grouped.insert("Oaxaca".to_string(), vec![animal(1, "Ajolote", "Oaxaca")]);

        let mut buf = Vec::new();
        TextView::new(&mut buf).show_catalog(&grouped).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Oaxaca"));
        assert!(text.contains("[1] Ajolote"));
        assert!(!text.contains("Jalisco"));
    }

    #[test]
    fn test_detail_rendering() {
        let mut buf = Vec::new();
        TextView::new(&mut buf)
            .show_detail(&animal(7, "Jaguar", "Chiapas"))
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Jaguar (Jaguar scientificus)"));
        assert!(text.contains("Region: Chiapas"));
    }
}
