use core::{arch::asm, fmt, ptr::addr_of_mut};

const IO_BASE: u16 = 0x3f8;
const THR: u16 = IO_BASE; // Transmitter Holding Reg (write-only)
const IER: u16 = IO_BASE + 1; // Interrupt Enable Reg
const FCR: u16 = IO_BASE + 2; // FIFO Control Reg (write-only)
const LCR: u16 = IO_BASE + 3; // Line Control Register
const MCR: u16 = IO_BASE + 4; // MODEM Control Register
const LSR: u16 = IO_BASE + 5; // Line Status Register (read-only)

const LSR_THR_EMPTY: u8 = 0x20;

unsafe fn outb(port: u16, byte: u8) {
    asm!("out dx, al", in("dx") port, in("al") byte);
}

unsafe fn inb(port: u16) -> u8 {
    let res: u8;
    asm!("in al, dx", in("dx") port, out("al") res);
    res
}

pub struct SerialWriter {
    initialized: bool,
}

impl SerialWriter {
    fn ensure_initialized(&mut self) {
        if self.initialized {
            return;
        }

        // SAFETY: Standard 16550 bring-up, 38400 baud 8N1 with FIFOs on.
        // https://wiki.osdev.org/Serial_Ports#Initialization
        unsafe {
            outb(IER, 0x00);
            outb(LCR, 0x80);
            outb(THR, 0x03);
            outb(IER, 0x00);
            outb(LCR, 0x03);
            outb(FCR, 0xC7);
            outb(MCR, 0x0F);
        }
        self.initialized = true;
    }
}

impl fmt::Write for SerialWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.ensure_initialized();

        for b in s.bytes() {
            // SAFETY: Waits for the holding register to drain before each byte.
            unsafe {
                while inb(LSR) & LSR_THR_EMPTY == 0 {}
                outb(THR, b);
            }
        }

        Ok(())
    }
}

static mut SERIAL_WRITER: SerialWriter = SerialWriter { initialized: false };

pub fn write_fmt(args: fmt::Arguments) {
    use fmt::Write;

    // SAFETY: Console output is only produced with interrupts disabled or
    // under the caller's lock; interleaving bytes is the worst case.
    let writer = unsafe { &mut *addr_of_mut!(SERIAL_WRITER) };
    let _ = writer.write_fmt(args);
}
