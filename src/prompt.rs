//! Terminal prompts: entering products and picking recipes

use std::io::{self, BufRead, Write};

use crate::calculator::RecipeChooser;
use crate::error::ValidationError;
use crate::models::{MonoRecipe, ResourceAmount};
use crate::resource::Resource;

/// Parse a `NUMBER NAME` product line
pub fn parse_demand_line(line: &str) -> Result<ResourceAmount, ValidationError> {
    let mut fields = line.split_whitespace();
    let (Some(amount), Some(name)) = (fields.next(), fields.next()) else {
        return Err(ValidationError::NotEnoughInput);
    };

    let amount: f64 = match amount.parse() {
        Ok(a) if f64::is_finite(a) => a,
        _ => return Err(ValidationError::NotANumber),
    };
    if amount < 0.0 {
        return Err(ValidationError::NegativeAmount);
    }

    let resource = Resource::resolve_alias(name)
        .ok_or_else(|| ValidationError::UnknownMaterial(name.to_string()))?;

    Ok(ResourceAmount::new(resource, amount))
}

/// Parse a menu selection: `0` is none, `1..=count` picks a recipe
pub fn parse_choice(line: &str, count: usize) -> Result<Option<usize>, ValidationError> {
    let line = line.trim();
    let choice: usize = line
        .parse()
        .map_err(|_| ValidationError::NotAnInteger(line.to_string()))?;

    match choice {
        0 => Ok(None),
        n if n <= count => Ok(Some(n - 1)),
        n => Err(ValidationError::ChoiceOutOfRange { choice: n, max: count }),
    }
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
    }
    Ok(line)
}

/// Ask how many products to make, then read each one, re-prompting on bad input
pub fn prompt_demands<R, W>(input: &mut R, output: &mut W) -> io::Result<Vec<ResourceAmount>>
where
    R: BufRead,
    W: Write,
{
    let count = loop {
        write!(output, "Enter number of products: ")?;
        output.flush()?;
        let line = read_line(input)?;
        match line.trim().parse::<usize>() {
            Ok(n) => break n,
            Err(_) => writeln!(output, "Input Invalid.")?,
        }
    };

    let mut demands = Vec::with_capacity(count);
    while demands.len() < count {
        writeln!(output, "Enter product in form \"NUMBER NAME\":")?;
        output.flush()?;
        let line = read_line(input)?;
        match parse_demand_line(&line) {
            Ok(demand) => demands.push(demand),
            Err(e) => writeln!(output, "Input Invalid: {}", e)?,
        }
    }

    Ok(demands)
}

/// Asks the user to pick a recipe from a numbered menu
pub struct InteractiveChooser<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> InteractiveChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn print_menu(&mut self, resource: Resource, candidates: &[&MonoRecipe]) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "Select {} recipe:", resource)?;
        writeln!(self.output)?;
        writeln!(self.output, "0.    NONE")?;
        for (i, recipe) in candidates.iter().enumerate() {
            writeln!(self.output, "{}.    {}", i + 1, recipe)?;
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> RecipeChooser for InteractiveChooser<R, W> {
    fn choose(&mut self, resource: Resource, candidates: &[&MonoRecipe]) -> io::Result<Option<usize>> {
        self.print_menu(resource, candidates)?;
        loop {
            write!(self.output, "\nEnter a number: ")?;
            self.output.flush()?;
            let line = read_line(&mut self.input)?;
            match parse_choice(&line, candidates.len()) {
                Ok(choice) => return Ok(choice),
                Err(e) => writeln!(self.output, "Input Invalid: {}", e)?,
            }
        }
    }
}
