// 🖥️ Interaction Shell - Line-based menu over the reservation engine
//
// Generic over reader/writer so sessions can be scripted in tests.

use crate::engine::{ReservationEngine, ReservationOutcome};
use crate::payment::PaymentProcessor;
use crate::storage::StateStore;
use anyhow::Result;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    ViewRooms,
    BookRoom(u32),
    CancelBooking(u32),
    ViewBookings,
    Exit,
}

pub struct Shell<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Shell { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run one session. Prompts for a name unless `user_name` is given.
    pub fn run<S: StateStore, P: PaymentProcessor>(
        &mut self,
        engine: &mut ReservationEngine<S, P>,
        user_name: Option<&str>,
    ) -> Result<()> {
        if let Some(err) = engine.load_error() {
            writeln!(self.output, "Warning: {}. Starting with a fresh hotel.", err)?;
        }

        let user_name = match user_name {
            Some(name) => name.to_string(),
            None => match self.prompt("Enter your name: ")? {
                Some(name) => name,
                None => return Ok(()),
            },
        };

        loop {
            let command = match self.next_command()? {
                Some(command) => command,
                None => continue,
            };

            match command {
                MenuCommand::ViewRooms => self.show_rooms(engine)?,
                MenuCommand::BookRoom(room) => {
                    let outcome = engine.book_room(&user_name, room);
                    self.show_outcome(engine, &outcome)?;
                }
                MenuCommand::CancelBooking(room) => {
                    let outcome = engine.cancel_booking(&user_name, room);
                    self.show_outcome(engine, &outcome)?;
                }
                MenuCommand::ViewBookings => self.show_bookings(engine)?,
                MenuCommand::Exit => {
                    writeln!(self.output, "Thank you for using Hotel Reservation System.")?;
                    return Ok(());
                }
            }
        }
    }

    /// Print the menu and read one command. Ok(None) means "ask again".
    /// End of input is treated as Exit.
    fn next_command(&mut self) -> Result<Option<MenuCommand>> {
        writeln!(self.output, "\n--- Hotel Reservation System ---")?;
        writeln!(self.output, "1. View Rooms")?;
        writeln!(self.output, "2. Book Room")?;
        writeln!(self.output, "3. Cancel Booking")?;
        writeln!(self.output, "4. View My Bookings")?;
        writeln!(self.output, "5. Exit")?;

        let choice = match self.prompt("Choose an option: ")? {
            Some(choice) => choice,
            None => return Ok(Some(MenuCommand::Exit)),
        };

        let command = match choice.parse::<u32>() {
            Ok(1) => MenuCommand::ViewRooms,
            Ok(2) => match self.prompt_room("Enter room number to book: ")? {
                Some(room) => MenuCommand::BookRoom(room),
                None => return Ok(None),
            },
            Ok(3) => match self.prompt_room("Enter room number to cancel: ")? {
                Some(room) => MenuCommand::CancelBooking(room),
                None => return Ok(None),
            },
            Ok(4) => MenuCommand::ViewBookings,
            Ok(5) => MenuCommand::Exit,
            _ => {
                writeln!(self.output, "Invalid option.")?;
                return Ok(None);
            }
        };

        Ok(Some(command))
    }

    fn prompt_room(&mut self, message: &str) -> Result<Option<u32>> {
        let line = match self.prompt(message)? {
            Some(line) => line,
            None => return Ok(None),
        };

        match line.parse::<u32>() {
            Ok(room) => Ok(Some(room)),
            Err(_) => {
                writeln!(self.output, "Invalid room number.")?;
                Ok(None)
            }
        }
    }

    /// Write a prompt and read one trimmed line. None at end of input.
    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{}", message)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn show_rooms<S: StateStore, P: PaymentProcessor>(
        &mut self,
        engine: &ReservationEngine<S, P>,
    ) -> Result<()> {
        writeln!(self.output, "\n--- Hotel Rooms ---")?;
        for room in engine.view_rooms() {
            writeln!(self.output, "{}", room)?;
        }
        Ok(())
    }

    fn show_bookings<S: StateStore, P: PaymentProcessor>(
        &mut self,
        engine: &ReservationEngine<S, P>,
    ) -> Result<()> {
        writeln!(self.output, "\n--- Current Bookings ---")?;
        let lines = engine.booking_lines();
        if lines.is_empty() {
            writeln!(self.output, "No bookings yet.")?;
        }
        for line in lines {
            writeln!(self.output, "{}", line)?;
        }
        Ok(())
    }

    fn show_outcome<S: StateStore, P: PaymentProcessor>(
        &mut self,
        engine: &ReservationEngine<S, P>,
        outcome: &ReservationOutcome,
    ) -> Result<()> {
        writeln!(self.output, "{}", outcome.message())?;

        if let ReservationOutcome::Booked { receipt, .. } = outcome {
            writeln!(self.output, "Processing payment of ${:.2}...", receipt.amount)?;
            writeln!(self.output, "Payment successful!")?;
        }

        if outcome.is_success() {
            if let Some(err) = engine.last_save_error() {
                writeln!(self.output, "Warning: {}", err)?;
            }
        }
        Ok(())
    }
}
