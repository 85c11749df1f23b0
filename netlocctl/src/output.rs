use libnetloc::LocationRecord;
use tabled::{Table, Tabled, settings::Style};

#[derive(Tabled)]
#[tabled(rename_all = "PascalCase")]
pub(crate) struct LocationRow {
    id: String,
    base_url: String,
    nickname: String,
    #[tabled(rename = "Type")]
    kind: String,
    last_accessed: String,
}

impl LocationRow {
    pub(crate) fn new(location: &LocationRecord) -> Self {
        Self {
            id: location.id.to_string(),
            base_url: location.base_url.to_string(),
            nickname: location.nickname.to_string(),
            kind: location
                .location_type()
                .map(|t| t.to_string())
                .unwrap_or_else(|| location.location_type.to_string()),
            last_accessed: location.last_accessed.to_string(),
        }
    }
}

pub(crate) fn location_table(locations: &[LocationRecord]) -> String {
    let mut table = Table::new(locations.iter().map(LocationRow::new));
    table.with(Style::psql());
    table.to_string()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_location_table() {
        let mut loc = LocationRecord::new("example.com").expect("failed to create location");
        loc.nickname = "Example".into();
        let mut odd = LocationRecord::new("odd.example.com").expect("failed to create location");
        odd.location_type = "Roaming".into();
        odd.last_accessed = 1685608200i64.into();
        let table = location_table(&[loc.clone(), odd]);
        assert!(table.contains("BaseUrl"));
        assert!(table.contains("example.com"));
        assert!(table.contains("Example"));
        assert!(table.contains("static"));
        assert!(table.contains(loc.id.as_text().expect("id isn't text")));
        assert!(table.contains("Roaming"));
        assert!(table.contains("1685608200"));
    }
}
