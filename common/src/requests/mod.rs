use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
/// Query string of the lead listing endpoint.
pub struct ListLeadsQuery {
    pub limit: Option<usize>,
}
