use std::fmt;

use crate::types::RuleBatch;

impl fmt::Display for RuleBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Naming format: {}", self.naming_format)?;
        writeln!(f, "Rules: {}", self.rules.len())?;

        for (i, rule) in self.rules.iter().enumerate() {
            writeln!(f)?;
            writeln!(f, "[{}] {}", i + 1, rule.scope)?;
            writeln!(f, "  match:   {}", rule.match_pattern)?;
            writeln!(f, "  replace: {}", rule.replace_template)?;
            if rule.has_offset() {
                writeln!(f, "  offset:  {:+}", rule.offset)?;
                writeln!(f, "  prefix:  {}", rule.anchor_prefix)?;
                writeln!(f, "  suffix:  {}", rule.anchor_suffix)?;
            }
        }

        if !self.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "Skipped:")?;
            for skip in &self.skipped {
                writeln!(f, "  {skip}")?;
            }
        }
        Ok(())
    }
}
