use serde::Deserialize;

use crate::forms::{clean_required, clean_url, FieldErrors};

const NAME_MAX: usize = 200;
const CNPJ_MAX: usize = 18;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CompanyForm {
    pub name: String,
    /// Tax id, usually formatted as `XX.XXX.XXX/XXXX-XX`.
    pub cnpj: String,
    pub website: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyInput {
    pub name: String,
    pub cnpj: String,
    pub website: String,
    pub description: String,
}

impl CompanyForm {
    /// CNPJ uniqueness is checked by the caller against the database.
    pub fn clean(&self, errors: &mut FieldErrors) -> CompanyInput {
        CompanyInput {
            name: clean_required(errors, "name", &self.name, NAME_MAX),
            cnpj: clean_required(errors, "cnpj", &self.cnpj, CNPJ_MAX),
            website: clean_url(errors, "website", &self.website),
            description: self.description.trim().to_string(),
        }
    }
}
