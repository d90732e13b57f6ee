//! Templates for generated Terraform files

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

pub const WARNING_HEADER: &str = "######################################
##   DO NOT EDIT THIS FILE          ##
##   Generated by tfconfig          ##
######################################

";

pub const ENVIRONMENT_TEMPLATE: &str = r#"{{ header }}module "{{ module_name }}" {
  source = "{{ source }}"
}
"#;

pub const BACKEND_TEMPLATE: &str = r#"bucket = "{{ terraform_state_bucket }}"

key = "{{ environment }}/{{ terraform_state_key }}/terraform.tfstate"

region = "{{ region }}"

dynamodb_table = "{{ terraform_lock_table }}"

kms_key_id = "{{ kms_key_arn }}"
"#;

/// Render `template` against `ctx`; unknown variables are errors
pub fn render<S: Serialize>(template: &str, ctx: S) -> Result<String, minijinja::Error> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(UndefinedBehavior::Strict);

    let tmpl = env.template_from_str(template)?;
    tmpl.render(ctx)
}
