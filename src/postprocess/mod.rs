/*!
 * Post-processing stages for raw model responses.
 *
 * Each stage is a small, independently testable unit:
 * - `lexicon`: static unit-abbreviation table and recognizers
 * - `expansion`: context-aware unit expansion
 * - `escalation`: one-shot model query for abbreviations outside the lexicon
 * - `extraction`: section extraction from free text or structured JSON
 * - `caption`: figure-description boilerplate stripping
 * - `length`: alt-text character-budget enforcement with one bounded retry
 */

pub mod caption;
pub mod escalation;
pub mod expansion;
pub mod extraction;
pub mod length;
pub mod lexicon;
